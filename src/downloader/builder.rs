//! Builder pattern implementation for creating Downloader instances.
//!
//! ```rust
//! use bulkport::downloader::DownloaderBuilder;
//! use bulkport::http::RemoteClientBuilder;
//!
//! # fn example() -> Result<(), bulkport::Error> {
//! let client = RemoteClientBuilder::new("https://api.example.com/v2/").build()?;
//! let downloader = DownloaderBuilder::hidden()
//!     .directory("./exports".into())
//!     .extract(false)
//!     .build(client);
//! # Ok(())
//! # }
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::transport::Transport;
use crate::ProgressBarOpts;

use std::path::PathBuf;

/// A builder used to create a [`Downloader`].
#[derive(Debug, Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden() -> Self {
        let mut builder = DownloaderBuilder::default();
        builder.config.progress = ProgressBarOpts::hidden();
        builder
    }

    /// Sets the default directory where to create the downloads.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Sets whether zip payloads are expanded by default.
    pub fn extract(mut self, extract: bool) -> Self {
        self.config.extract = extract;
        self
    }

    /// Set the progress bar style.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// Create the [`Downloader`] fetching through `transport`.
    pub fn build<T: Transport>(self, transport: T) -> Downloader<T> {
        Downloader::new(transport, self.config)
    }
}
