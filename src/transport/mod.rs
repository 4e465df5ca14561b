//! The remote-call abstraction the transfer pipelines are written against.
//!
//! [`Transport`] exposes exactly the three primitives the pipelines need:
//! obtaining a fresh upload slot, posting a multipart upload into it, and
//! opening a streamed download. [`RemoteClient`](crate::http::RemoteClient)
//! implements it over HTTP; tests drive the pipelines with in-memory doubles.

use crate::error::Result;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use tokio::fs::File;

/// `Accept` value used for downloads: any content type.
///
/// Export artifacts must not be negotiated into the JSON format the rest of
/// the API speaks.
pub const ACCEPT_ANY: &str = "*/*";

/// A response body delivered chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Opaque token identifying a pending upload slot on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(String);

impl FileHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FileHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The fields of a multipart upload.
///
/// The form owns the open file: whatever happens to the request, the handle
/// is released when the form (or the body built from it) is dropped.
#[derive(Debug)]
pub struct UploadForm {
    /// Method discriminator sent as the `method` field.
    pub method: &'static str,
    /// Slot obtained from [`Transport::initialise`], sent as the `key` field.
    pub key: FileHandle,
    /// Basename the file part is bound to.
    pub file_name: String,
    /// Sniffed MIME type of the file part.
    pub mime: String,
    /// Size of the file in bytes.
    pub length: u64,
    /// The file itself, streamed as the `file` field.
    pub file: File,
}

impl UploadForm {
    /// Method discriminator of file uploads.
    pub const METHOD: &'static str = "file.upload";
}

/// A streamed response body together with its announced length, if any.
pub struct RemoteBody {
    pub content_length: Option<u64>,
    pub stream: ByteStream,
}

impl fmt::Debug for RemoteBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Remote primitives used by the upload and download pipelines.
///
/// Errors are returned as produced by the implementation; the pipelines never
/// wrap or retry them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Asks the service for a fresh upload slot.
    async fn initialise(&self) -> Result<FileHandle>;

    /// Sends a single multipart upload request.
    async fn post_multipart(&self, form: UploadForm) -> Result<()>;

    /// Opens a streamed GET of the resource addressed by `segments` below the
    /// service root, requesting `accept` as response content type.
    ///
    /// Segments are raw values; implementations escape them.
    async fn get_stream(&self, segments: &[&str], accept: &str) -> Result<RemoteBody>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn initialise(&self) -> Result<FileHandle> {
        (**self).initialise().await
    }

    async fn post_multipart(&self, form: UploadForm) -> Result<()> {
        (**self).post_multipart(form).await
    }

    async fn get_stream(&self, segments: &[&str], accept: &str) -> Result<RemoteBody> {
        (**self).get_stream(segments, accept).await
    }
}
