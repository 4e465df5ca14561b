//! The download pipeline.
//!
//! A download streams the remote body into a fresh, uniquely named file,
//! sniffs what arrived and names the file after it. Until the artifact is
//! fully resolved, every failure removes the file again.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bulkport::download::DownloadOptions;
//! use bulkport::downloader::DownloaderBuilder;
//! use bulkport::http::RemoteClientBuilder;
//!
//! # async fn example() -> Result<(), bulkport::Error> {
//! let client = RemoteClientBuilder::new("https://api.example.com/v2/").build()?;
//! let downloader = DownloaderBuilder::new().build(client);
//!
//! let artifact = downloader
//!     .download("listexport", "1234", DownloadOptions::default())
//!     .await?;
//! println!("Saved {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use super::target::{stream_into, TransferTarget};
use crate::content::{resolve, sniff, ResolvedArtifact};
use crate::download::{DownloadOptions, DownloadRequest};
use crate::error::{Error, Result};
use crate::transport::{Transport, ACCEPT_ANY};
use crate::utils::run_blocking;

use std::path::Path;
use tracing::{debug, info};

/// Represents the download controller.
///
/// A downloader is created via [`DownloaderBuilder`](super::DownloaderBuilder).
#[derive(Debug, Clone)]
pub struct Downloader<T> {
    transport: T,
    config: DownloaderConfig,
}

impl<T: Transport> Downloader<T> {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(transport: T, config: DownloaderConfig) -> Self {
        Self { transport, config }
    }

    /// Gets the default directory where files will be downloaded.
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Gets whether zip payloads are expanded by default.
    pub fn extract(&self) -> bool {
        self.config.extract
    }

    /// Gets the transport used to fetch resources.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Downloads the resource `primary_id` of type `resource_type`.
    ///
    /// `resource_type` is one of `file`, `listexport` or `dataexport`;
    /// anything else fails with [`Error::InvalidInput`] before any I/O.
    pub async fn download(
        &self,
        resource_type: &str,
        primary_id: &str,
        options: DownloadOptions,
    ) -> Result<ResolvedArtifact> {
        let request = DownloadRequest::new(resource_type, primary_id)?.with_options(options);
        self.download_request(&request).await
    }

    /// Downloads the resource described by `request`.
    pub async fn download_request(&self, request: &DownloadRequest) -> Result<ResolvedArtifact> {
        let directory = request
            .options
            .directory
            .as_deref()
            .unwrap_or(&self.config.directory);
        let extract = request.options.extract.unwrap_or(self.config.extract);

        let mut target = TransferTarget::create(directory, &request.file_prefix()).await?;
        info!(
            "type" = %request.resource_type,
            primary_id = %request.primary_id,
            path = %target.path().display(),
            "Downloading"
        );

        debug!("Fetching {}", request.segments().join("/"));
        let body = self
            .transport
            .get_stream(&request.segments(), ACCEPT_ANY)
            .await?;

        debug!("Retrieving chunks...");
        let pb = self.config.progress.to_progress_bar(body.content_length);
        match stream_into(&mut target, body.stream, &pb).await {
            Ok(()) => self.config.progress.finish(pb),
            Err(e) => {
                self.config.progress.abandon(pb);
                return Err(e);
            }
        }

        let (path, bytes) = target.finish().await?;
        info!(
            "type" = %request.resource_type,
            primary_id = %request.primary_id,
            path = %path.display(),
            bytes,
            "Download complete"
        );

        // Until `keep`, dropping the guard deletes whatever is left at `path`.
        let artifact = run_blocking(move || {
            let mime = sniff(&path)?;
            let artifact = resolve(&path, &mime, extract)?;
            path.keep().map_err(|e| Error::local_io(&artifact.path, e.error))?;
            Ok(artifact)
        })
        .await?;

        debug!("Resolved {:?} as {:?}", artifact.path, artifact.extension);
        Ok(artifact)
    }
}
