//! Progress bar styling for transfers.
//!
//! # Examples
//!
//! ```rust
//! use bulkport::progress::ProgressBarOpts;
//!
//! let opts = ProgressBarOpts::new(
//!     Some("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}".to_string()),
//!     Some(ProgressBarOpts::CHARS_FINE.to_string()),
//!     true,
//!     false,
//! );
//! assert!(opts.is_enabled());
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

/// Define the options for a progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string.
    template: Option<String>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: Option<String>,
    /// Enable or disable the progress bar.
    pub(crate) enabled: bool,
    /// Clear the progress bar once completed.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self {
            template: None,
            progress_chars: None,
            enabled: true,
            clear: true,
        }
    }
}

impl ProgressBarOpts {
    /// Template which looks like the Python package installer pip.
    ///
    /// `━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━ 211.23 KiB/211.23 KiB 1008.31 KiB/s eta 0s`
    pub const TEMPLATE_PIP: &'static str =
        "{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} eta {eta:.blue}";
    /// Template for bodies of unknown length.
    pub const TEMPLATE_SPINNER: &'static str =
        "{spinner:.green} {bytes:>11.green} {bytes_per_sec:>13.red} {msg}";
    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Use a line as progress characters: `"━╾─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";

    /// Create a new [`ProgressBarOpts`].
    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// Create a [`ProgressStyle`] based on the provided options.
    ///
    /// An invalid template falls back to the default bar.
    pub fn to_progress_style(&self) -> ProgressStyle {
        let mut style = ProgressStyle::default_bar();
        if let Some(ref template) = self.template {
            style = match ProgressStyle::default_bar().template(template) {
                Ok(templated) => templated,
                Err(e) => {
                    warn!("Ignoring invalid progress template {:?}: {}", template, e);
                    style
                }
            };
        }
        if let Some(ref progress_chars) = self.progress_chars {
            style = style.progress_chars(progress_chars);
        }
        style
    }

    /// Create a [`ProgressBar`] for a transfer of `len` bytes, or of unknown
    /// length when `len` is `None`.
    pub fn to_progress_bar(&self, len: Option<u64>) -> ProgressBar {
        // Return a hidden Progress bar if we disabled it.
        if !self.enabled {
            return ProgressBar::hidden();
        }

        match len {
            Some(len) => ProgressBar::new(len).with_style(self.to_progress_style()),
            None => {
                let style = ProgressStyle::default_spinner()
                    .template(Self::TEMPLATE_SPINNER)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                ProgressBar::new_spinner().with_style(style)
            }
        }
    }

    /// Finish `pb`, clearing it if requested.
    pub fn finish(&self, pb: ProgressBar) {
        if self.clear {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
    }

    /// Stop `pb` after a failed transfer, leaving it at its current position
    /// unless clearing was requested.
    pub fn abandon(&self, pb: ProgressBar) {
        if self.clear {
            pb.finish_and_clear();
        } else {
            pb.abandon();
        }
    }

    /// Create a new [`ProgressBarOpts`] which looks like Python pip.
    pub fn with_pip_style() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_PIP.into()),
            progress_chars: Some(ProgressBarOpts::CHARS_LINE.into()),
            enabled: true,
            clear: true,
        }
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    /// Return `false` if the bar is hidden.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create a new [`ProgressBarOpts`] which hides the progress bars.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::default()
        }
    }
}
