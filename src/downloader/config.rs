//! Configuration structures and defaults for the downloader.

use crate::ProgressBarOpts;

use std::env::temp_dir;
use std::path::PathBuf;

/// Capacity of the write buffer between the response body and the disk.
pub const CHUNK_SIZE: usize = 101_400;

/// Configuration structure for the downloader
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Directory where downloads are created unless a request says otherwise.
    pub directory: PathBuf,
    /// Expand zip payloads unless a request says otherwise.
    pub extract: bool,
    /// Style of the byte progress bar.
    pub progress: ProgressBarOpts,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: temp_dir(),
            extract: true,
            progress: ProgressBarOpts::with_pip_style(),
        }
    }
}
