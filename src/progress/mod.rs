//! Progress reporting for downloads.
//!
//! Downloads drive a single byte-level bar styled by [`ProgressBarOpts`].
//! Pass [`ProgressBarOpts::hidden`] to the downloader to turn it off.

pub(crate) mod style;

pub use style::ProgressBarOpts;
