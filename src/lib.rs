//! Bulkport moves bulk data to and from a marketing-automation service:
//! files are uploaded as multipart payloads, exports are streamed to disk
//! and named after what they turn out to contain.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bulkport::{DownloadOptions, DownloaderBuilder, Error, RemoteClientBuilder, Uploader};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let client = RemoteClientBuilder::new("https://api.example.com/v2/").build()?;
//!
//! let key = Uploader::new(client.clone()).upload("contacts.csv").await?;
//! println!("Uploaded as {}", key);
//!
//! let downloader = DownloaderBuilder::new().build(client);
//! let artifact = downloader
//!     .download("listexport", "1234", DownloadOptions::default())
//!     .await?;
//! println!("Saved {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`transport`] - The `Transport` trait the pipelines are written against
//! - [`http`] - The HTTP implementation of `Transport`
//! - [`uploader`] - The upload pipeline
//! - [`download`] - Download requests and results
//! - [`downloader`] - The download pipeline and its builder
//! - [`content`] - Content sniffing and artifact naming
//! - [`archive`] - Single-member zip expansion
//! - [`progress`] - Progress bar styling
//! - [`error`] - Centralized error handling with the `Error` enum

pub mod archive;
pub mod content;
pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod progress;
pub mod transport;
pub mod uploader;
pub(crate) mod utils;

pub use content::ResolvedArtifact;
pub use download::{DownloadOptions, DownloadRequest, ResourceType};
pub use downloader::{Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig, RemoteClient, RemoteClientBuilder};
pub use progress::ProgressBarOpts;
pub use transport::{FileHandle, Transport};
pub use uploader::Uploader;
