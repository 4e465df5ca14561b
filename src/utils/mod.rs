//! Shared utility functions.

use crate::error::{Error, Result};

/// Runs blocking filesystem work off the async runtime.
///
/// A panicked or cancelled task is reported as [`Error::Internal`].
pub(crate) async fn run_blocking<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("blocking task failed: {}", e)))?
}
