//! The upload pipeline.
//!
//! An upload first asks the service for a slot, then streams the file into
//! it as a single multipart request:
//!
//! ```rust,no_run
//! use bulkport::http::RemoteClientBuilder;
//! use bulkport::uploader::Uploader;
//!
//! # async fn example() -> Result<(), bulkport::Error> {
//! let client = RemoteClientBuilder::new("https://api.example.com/v2/").build()?;
//! let key = Uploader::new(client).upload("contacts.csv").await?;
//! println!("Uploaded as {}", key);
//! # Ok(())
//! # }
//! ```

use crate::content::sniff;
use crate::error::{Error, Result};
use crate::transport::{FileHandle, Transport, UploadForm};
use crate::utils::run_blocking;

use std::path::Path;
use tokio::fs::{self, File};
use tracing::{debug, info};

/// Uploads local files through a [`Transport`].
#[derive(Debug, Clone)]
pub struct Uploader<T> {
    transport: T,
}

impl<T: Transport> Uploader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Gets the transport used to reach the service.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Uploads the file at `path` and returns the key it is stored under.
    ///
    /// A missing, non-regular or unreadable file fails with
    /// [`Error::InvalidInput`] before anything is sent.
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<FileHandle> {
        let path = path.as_ref();
        let (file_name, length) = check_source(path).await?;

        let owned = path.to_path_buf();
        let mime = run_blocking(move || sniff(&owned)).await?;
        debug!("Uploading {} as {}", path.display(), mime);

        let key = self.transport.initialise().await?;

        let file = File::open(path)
            .await
            .map_err(|e| Error::local_io(path, e))?;

        info!(file_key = %key, path = %path.display(), "Uploading file");
        self.transport
            .post_multipart(UploadForm {
                method: UploadForm::METHOD,
                key: key.clone(),
                file_name,
                mime,
                length,
                file,
            })
            .await?;
        info!(file_key = %key, path = %path.display(), "Upload complete");

        Ok(key)
    }
}

/// Checks that `path` is a readable regular file, returning its basename and
/// size.
async fn check_source(path: &Path) -> Result<(String, u64)> {
    let invalid = |reason: String| Error::InvalidInput(format!("{}: {}", path.display(), reason));

    let metadata = fs::metadata(path)
        .await
        .map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_file() {
        return Err(invalid("not a regular file".into()));
    }

    File::open(path).await.map_err(|e| invalid(e.to_string()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| invalid("no file name".into()))?;

    Ok((file_name, metadata.len()))
}
