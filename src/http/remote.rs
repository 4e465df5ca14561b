//! HTTP implementation of [`Transport`].
//!
//! ```rust,no_run
//! use bulkport::http::RemoteClientBuilder;
//! use reqwest::header::{HeaderValue, AUTHORIZATION};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), bulkport::Error> {
//! let client = RemoteClientBuilder::new("https://api.example.com/v2/")
//!     .header(AUTHORIZATION, HeaderValue::from_static("Bearer s3cr3t"))
//!     .timeout(Duration::from_secs(600))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::client::{build_inner_client, with_middleware, HttpClientConfig};
use super::decode::{self, decode_response, DecodeError, DecodeErrorKind};
use crate::error::{Error, Result};
use crate::transport::{FileHandle, RemoteBody, Transport, UploadForm};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{
    header::{HeaderMap, HeaderValue, IntoHeaderName, ACCEPT, CONTENT_TYPE},
    multipart::{Form, Part},
    Body, Proxy, Response, Url,
};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::debug;

const JSON: &str = "application/json";

/// Connection to the remote service.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RemoteClient {
    /// Service root. Calls are posted here, downloads are addressed below it.
    base_url: Url,
    /// Client for calls and downloads.
    client: ClientWithMiddleware,
    /// Client for streamed uploads, never retried.
    uploads: ClientWithMiddleware,
    /// Source of JSON-RPC request ids.
    next_id: Arc<AtomicU64>,
}

impl fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RemoteClient {
    /// Method asking the service for a fresh upload slot.
    pub const INITIALISE_METHOD: &'static str = "file.initialise";

    /// Gets the service root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL of a resource below the service root.
    pub fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("\"{}\" cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn call(&self, method: &str) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({ "jsonrpc": "2.0", "method": method, "id": id });

        debug!(method, id, "Calling {}", self.base_url);
        let res = self
            .client
            .post(self.base_url.clone())
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .body(payload.to_string())
            .send()
            .await?;

        read_envelope(res).await
    }
}

#[async_trait]
impl Transport for RemoteClient {
    async fn initialise(&self) -> Result<FileHandle> {
        let result = self.call(Self::INITIALISE_METHOD).await?;
        decode::file_key(&result)
            .map(FileHandle::new)
            .ok_or_else(|| {
                Error::Decode(DecodeError::new(
                    DecodeErrorKind::MissingResult,
                    format!("initialise returned no file key: {}", result),
                ))
            })
    }

    async fn post_multipart(&self, form: UploadForm) -> Result<()> {
        let UploadForm {
            method,
            key,
            file_name,
            mime,
            length,
            file,
        } = form;

        let body = Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, length)
            .file_name(file_name)
            .mime_str(&mime)?;
        let form = Form::new()
            .text("method", method)
            .text("key", key.to_string())
            .part("file", part);

        debug!(method, file_key = %key, "Posting {} bytes to {}", length, self.base_url);
        let res = self
            .uploads
            .post(self.base_url.clone())
            .header(ACCEPT, JSON)
            .multipart(form)
            .send()
            .await?;

        read_envelope(res).await.map(|_| ())
    }

    async fn get_stream(&self, segments: &[&str], accept: &str) -> Result<RemoteBody> {
        let url = self.resource_url(segments)?;

        debug!("Fetching {}", url);
        let res = self.client.get(url).header(ACCEPT, accept).send().await?;
        let res = res.error_for_status()?;

        let content_length = res.content_length();
        let stream = res.bytes_stream().map(|item| item.map_err(Error::from));

        Ok(RemoteBody {
            content_length,
            stream: Box::pin(stream),
        })
    }
}

/// Reads and decodes a response envelope.
///
/// An error envelope wins over the HTTP status so the service's own message
/// reaches the caller.
async fn read_envelope(res: Response) -> Result<Value> {
    let status_error = res.error_for_status_ref().err();
    let body = res.bytes().await?;

    match decode_response(&body) {
        Ok(value) => match status_error {
            Some(e) => Err(e.into()),
            None => Ok(value),
        },
        Err(DecodeError {
            kind: DecodeErrorKind::Remote { code },
            message,
        }) => Err(Error::Remote { code, message }),
        Err(e) => match status_error {
            Some(status_error) => Err(status_error.into()),
            None => Err(e.into()),
        },
    }
}

/// A builder used to create a [`RemoteClient`].
#[derive(Debug, Clone)]
pub struct RemoteClientBuilder {
    base_url: String,
    config: HttpClientConfig,
}

impl RemoteClientBuilder {
    /// Creates a builder for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            config: HttpClientConfig::default(),
        }
    }

    /// Set the number of retries for transient failures of calls and
    /// downloads. Uploads are never retried.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Route requests through `proxy`.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Set the deadline of a whole request, body transfer included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add default headers, merged with the ones already set.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add a default header.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`RemoteClient`].
    pub fn build(self) -> Result<RemoteClient> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            Error::InvalidUrl(format!("the url \"{}\" cannot be parsed: {}", self.base_url, e))
        })?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "the url \"{}\" is not an http(s) service root",
                base_url
            )));
        }

        let retries = self.config.retries;
        let inner = build_inner_client(self.config)?;

        Ok(RemoteClient {
            base_url,
            client: with_middleware(inner.clone(), retries),
            uploads: with_middleware(inner, 0),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }
}
