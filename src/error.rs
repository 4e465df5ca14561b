//! Error handling for bulkport.
//!
//! Every fallible operation in the crate returns [`Result`]. Transport
//! failures coming out of the HTTP stack are carried unchanged so callers can
//! decide on retries themselves; local failures carry the OS-reported reason.

use crate::http::decode::DecodeError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can happen when transferring files.
#[derive(Error, Debug)]
pub enum Error {
    /// The caller handed in something unusable: an unknown resource type, an
    /// empty primary id, or a source file that is missing or unreadable.
    ///
    /// No I/O has been performed when this is returned.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A local filesystem operation failed.
    ///
    /// `reason` is the message reported by the operating system.
    #[error("Local I/O error on {}: {reason}", path.display())]
    LocalIo {
        path: PathBuf,
        reason: String,
        #[source]
        source: io::Error,
    },

    /// The content of a file could not be inspected.
    ///
    /// This is an environment failure, not an "unknown type" result.
    #[error("Content detection failed for {}: {message}", path.display())]
    Detection { path: PathBuf, message: String },

    /// A zip archive could not be opened, decoded or renamed.
    #[error("Archive error: {message}")]
    Archive {
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error from the middleware-wrapped HTTP client.
    #[error("Transport error")]
    Transport {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// Error from the Reqwest library.
    ///
    /// Raised for non-success statuses and for failures while reading a
    /// response body.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// The remote service answered with something that is not a valid
    /// response envelope.
    #[error("Invalid response: {0}")]
    Decode(#[from] DecodeError),

    /// The remote service answered with an error envelope.
    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The configured service URL cannot be used.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wraps an I/O error that happened on `path`.
    pub(crate) fn local_io(path: &Path, source: io::Error) -> Self {
        Error::LocalIo {
            path: path.to_path_buf(),
            reason: source.to_string(),
            source,
        }
    }

    pub(crate) fn archive(message: impl Into<String>) -> Self {
        Error::Archive {
            message: message.into(),
            cause: None,
        }
    }

    pub(crate) fn archive_caused_by<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Archive {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }
}

/// Result type alias for operations that can fail with a bulkport error.
pub type Result<T> = std::result::Result<T, Error>;
