//! Single-member ZIP expansion.
//!
//! Export artifacts are delivered as zip archives holding exactly one CSV
//! file. [`expand`] extracts the entry at index 0 next to the archive and
//! removes the archive. Any further entries are ignored.

use crate::error::{Error, Result};

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use zip::ZipArchive;

/// Suffix given to the extracted member.
pub const EXTRACTED_EXTENSION: &str = "csv";

/// Extracts the first entry of the archive at `archive` and deletes the
/// archive.
///
/// The member lands next to the archive as `<archive stem>.csv`; the
/// returned path points to it. On failure the archive is left in place and
/// no partial output remains.
pub fn expand(archive: &Path) -> Result<PathBuf> {
    let target = archive.with_extension(EXTRACTED_EXTENSION);

    let file = File::open(archive).map_err(|e| {
        Error::archive_caused_by(format!("could not open {}", archive.display()), e)
    })?;

    let dir = match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut output = NamedTempFile::new_in(dir).map_err(|e| Error::local_io(dir, e))?;

    let name = extract_first(file, output.as_file_mut())?;

    output.persist(&target).map_err(|e| {
        Error::archive_caused_by(format!("could not rename to {}", target.display()), e.error)
    })?;

    if target != archive {
        if let Err(e) = fs::remove_file(archive) {
            let _ = fs::remove_file(&target);
            return Err(Error::local_io(archive, e));
        }
    }

    debug!("Expanded {} ({}) into {}", archive.display(), name, target.display());
    Ok(target)
}

/// Decompresses the entry at index 0 of `reader` into `output` and returns
/// its name.
///
/// The checksum is verified by the zip reader once the entry is read to the
/// end; the byte count is checked against the central directory here.
pub fn extract_first<R: Read + Seek, W: Write>(reader: R, output: W) -> Result<String> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| Error::archive_caused_by("could not read the central directory", e))?;
    if archive.len() == 0 {
        return Err(Error::archive("the archive contains no entries"));
    }

    let mut entry = archive
        .by_index(0)
        .map_err(|e| Error::archive_caused_by("could not open the first entry", e))?;
    let name = entry.name().to_string();
    let expected = entry.size();
    debug!("Extracting {} ({} bytes)", name, expected);

    let mut output = BufWriter::new(output);
    let written = io::copy(&mut entry, &mut output)
        .and_then(|written| output.flush().map(|_| written))
        .map_err(|e| Error::archive_caused_by(format!("could not extract '{}'", name), e))?;

    if written != expected {
        return Err(Error::archive(format!(
            "'{}' is corrupt: expected {} bytes, got {}",
            name, expected, written
        )));
    }

    Ok(name)
}
