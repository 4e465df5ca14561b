//! The local file a download is streamed into.

use super::config::CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::transport::ByteStream;

use bytes::Bytes;
use futures::StreamExt;
use indicatif::ProgressBar;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// A uniquely named file receiving a download.
///
/// Dropping the target deletes the file; [`TransferTarget::finish`] hands
/// the path guard over once everything has been written.
pub(crate) struct TransferTarget<W = BufWriter<File>> {
    // Declared first so the handle is closed before the file is removed.
    writer: W,
    path: TempPath,
    written: u64,
}

impl TransferTarget {
    /// Creates `<prefix><random>` in `directory`, creating the directory if
    /// needed.
    pub(crate) async fn create(directory: &Path, prefix: &str) -> Result<Self> {
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|e| Error::local_io(directory, e))?;

        let (file, path) = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(directory)
            .map_err(|e| Error::local_io(directory, e))?
            .into_parts();

        let writer = BufWriter::with_capacity(CHUNK_SIZE, File::from_std(file));
        Ok(Self::new(path, writer))
    }
}

impl<W: AsyncWrite + Unpin> TransferTarget<W> {
    pub(crate) fn new(path: TempPath, writer: W) -> Self {
        Self {
            writer,
            path,
            written: 0,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) async fn write_chunk(&mut self, mut chunk: Bytes) -> Result<()> {
        let len = chunk.len() as u64;
        self.writer
            .write_all_buf(&mut chunk)
            .await
            .map_err(|e| Error::local_io(&self.path, e))?;
        self.written += len;
        Ok(())
    }

    /// Flushes and closes the file, returning its path guard and size.
    pub(crate) async fn finish(self) -> Result<(TempPath, u64)> {
        let TransferTarget {
            mut writer,
            path,
            written,
        } = self;

        if let Err(e) = writer.shutdown().await {
            drop(writer);
            return Err(Error::local_io(&path, e));
        }
        drop(writer);

        Ok((path, written))
    }
}

/// Copies `stream` into `target` chunk by chunk.
///
/// Stops at the first error; the rest of the stream is not read.
pub(crate) async fn stream_into<W: AsyncWrite + Unpin>(
    target: &mut TransferTarget<W>,
    mut stream: ByteStream,
    pb: &ProgressBar,
) -> Result<()> {
    while let Some(item) = stream.next().await {
        let chunk = item?;
        pb.inc(chunk.len() as u64);
        target.write_chunk(chunk).await?;
    }
    Ok(())
}
