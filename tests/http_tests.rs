//! Tests for the HTTP transport against a local mock server.

use bulkport::http::{create_http_client, HttpClientConfig, RemoteClient, RemoteClientBuilder};
use bulkport::transport::Transport;
use bulkport::{DownloadOptions, Error, Uploader};
use httpmock::prelude::*;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde_json::json;
use std::fs;

mod common;
use common::helpers::*;

fn remote_client(server: &MockServer) -> RemoteClient {
    RemoteClientBuilder::new(server.url("/api/"))
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer test-token"))
        .build()
        .unwrap()
}

#[test]
fn test_create_http_client_with_test_config() {
    let config = HttpClientConfig {
        retries: 3,
        ..HttpClientConfig::default()
    };
    assert!(create_http_client(config).is_ok());
}

#[tokio::test]
async fn test_initialise() {
    init_tracing();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/")
                .header("authorization", "Bearer test-token")
                .header("content-type", "application/json")
                .body_contains(r#""jsonrpc":"2.0""#)
                .body_contains(r#""method":"file.initialise""#);
            then.status(200)
                .json_body(json!({"jsonrpc": "2.0", "result": {"key": "k-1"}, "id": 1}));
        })
        .await;

    let key = remote_client(&server).initialise().await.unwrap();

    assert_eq!(key.as_str(), "k-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_initialise_bare_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/");
            then.status(200).json_body(json!({"result": "k-2"}));
        })
        .await;

    let key = remote_client(&server).initialise().await.unwrap();
    assert_eq!(key.as_str(), "k-2");
}

#[tokio::test]
async fn test_remote_error_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/");
            then.status(200)
                .json_body(json!({"error": {"code": 401, "message": "invalid credentials"}}));
        })
        .await;

    let err = remote_client(&server).initialise().await.unwrap_err();
    match err {
        Error::Remote { code, message } => {
            assert_eq!(code, 401);
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("Expected Remote, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_envelope_wins_over_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/");
            then.status(500)
                .json_body(json!({"error": {"code": -32603, "message": "internal"}}));
        })
        .await;

    let err = remote_client(&server).initialise().await.unwrap_err();
    assert!(matches!(err, Error::Remote { code: -32603, .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_bad_status_without_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let err = remote_client(&server).initialise().await.unwrap_err();
    assert!(matches!(err, Error::Reqwest { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_malformed_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/");
            then.status(200).body("not json");
        })
        .await;

    let err = remote_client(&server).initialise().await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_upload_over_http() {
    init_tracing();
    let dir = create_temp_dir();
    let path = create_temp_file(dir.path(), "contacts.csv", TEST_CSV);

    let server = MockServer::start_async().await;
    let initialise = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/")
                .body_contains(r#""method":"file.initialise""#);
            then.status(200).json_body(json!({"result": {"key": "k-77"}}));
        })
        .await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/")
                .header_exists("content-type")
                .body_contains(r#"name="method""#)
                .body_contains("file.upload")
                .body_contains(r#"name="key""#)
                .body_contains("k-77")
                .body_contains(r#"filename="contacts.csv""#)
                .body_contains("Content-Type: text/csv")
                .body_contains("Turing, Alan");
            then.status(200).json_body(json!({"result": true}));
        })
        .await;

    let key = Uploader::new(remote_client(&server))
        .upload(&path)
        .await
        .unwrap();

    assert_eq!(key.as_str(), "k-77");
    initialise.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn test_download_over_http() {
    init_tracing();
    let dir = create_temp_dir();
    let content = create_csv_content(20_000);

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/listexport/id/1234")
                .header("accept", "*/*")
                .header("authorization", "Bearer test-token");
            then.status(200)
                .header("content-type", "application/json")
                .body(&content);
        })
        .await;

    let downloader = create_test_downloader(remote_client(&server), dir.path());
    let artifact = downloader
        .download("listexport", "1234", DownloadOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
    // The declared content type is ignored.
    assert_eq!(artifact.extension.as_deref(), Some("csv"));
    assert_eq!(fs::read(&artifact.path).unwrap(), content);
}

#[tokio::test]
async fn test_download_not_found() {
    let dir = create_temp_dir();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/dataexport/id/404");
            then.status(404);
        })
        .await;

    let err = create_test_downloader(remote_client(&server), dir.path())
        .download("dataexport", "404", DownloadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Reqwest { .. }), "got {:?}", err);
    assert!(list_dir(dir.path()).is_empty());
}

#[tokio::test]
async fn test_unreachable_service() {
    let dir = create_temp_dir();
    // Nothing listens on the discard port.
    let client = RemoteClientBuilder::new("http://127.0.0.1:9/api/").build().unwrap();

    let err = create_test_downloader(client, dir.path())
        .download("file", "k", DownloadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }), "got {:?}", err);
    assert!(list_dir(dir.path()).is_empty());
}
