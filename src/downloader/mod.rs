//! The download pipeline, its builder and configuration.
//!
//! - `downloader` - the [`Downloader`] running downloads against a
//!   [`Transport`](crate::transport::Transport)
//! - `builder` - [`DownloaderBuilder`]
//! - `config` - [`DownloaderConfig`] and its defaults
//!
//! # Hidden Progress Bar
//!
//! ```rust
//! use bulkport::downloader::DownloaderBuilder;
//! use bulkport::http::RemoteClientBuilder;
//!
//! # fn example() -> Result<(), bulkport::Error> {
//! let client = RemoteClientBuilder::new("https://api.example.com/").build()?;
//! let downloader = DownloaderBuilder::hidden().build(client);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
pub(crate) mod target;

pub use builder::DownloaderBuilder;
pub use config::{DownloaderConfig, CHUNK_SIZE};
pub use downloader::Downloader;
