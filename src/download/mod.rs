//! Download requests and their results.
//!
//! - [`request`] - the closed set of [`ResourceType`]s and the
//!   [`DownloadRequest`] addressing one of them
//!
//! A successful download yields a [`ResolvedArtifact`].

pub mod request;

pub use crate::content::ResolvedArtifact;
pub use request::{DownloadOptions, DownloadRequest, ResourceType};
