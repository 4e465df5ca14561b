//! Final naming of downloaded artifacts.
//!
//! A downloaded file starts without an extension. Once its type is known, an
//! ordered rule table decides what it becomes: zip payloads are expanded or
//! kept, documents and tabular data get their usual suffix, anything else is
//! left alone.

use crate::archive;
use crate::error::{Error, Result};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What to do with a downloaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Extract the single archive member, which becomes a `.csv` file.
    Expand,
    /// Replace the file's extension.
    Rename(&'static str),
    /// Leave the file as it is.
    Keep,
}

/// A fully written, correctly named file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// Location of the file.
    pub path: PathBuf,
    /// Extension given to the file, `None` when no rule applied.
    pub extension: Option<String>,
}

impl ResolvedArtifact {
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

struct Rule {
    matches: fn(&str, bool) -> bool,
    action: Action,
}

/// First match wins. Compression must be tested before text.
const RULES: &[Rule] = &[
    Rule {
        matches: zip_to_expand,
        action: Action::Expand,
    },
    Rule {
        matches: zip_to_keep,
        action: Action::Rename("zip"),
    },
    Rule {
        matches: pdf,
        action: Action::Rename("pdf"),
    },
    Rule {
        matches: csv,
        action: Action::Rename("csv"),
    },
    // Plain-text exports of the service are always comma separated.
    Rule {
        matches: plain_text,
        action: Action::Rename("csv"),
    },
];

fn zip_to_expand(mime: &str, extract: bool) -> bool {
    extract && mime.contains("zip")
}

fn zip_to_keep(mime: &str, extract: bool) -> bool {
    !extract && mime.contains("zip")
}

fn pdf(mime: &str, _: bool) -> bool {
    mime.contains("pdf")
}

fn csv(mime: &str, _: bool) -> bool {
    mime.contains("csv")
}

fn plain_text(mime: &str, _: bool) -> bool {
    mime == "text/plain"
}

/// Picks the action for a sniffed type.
pub fn classify(mime: &str, extract: bool) -> Action {
    RULES
        .iter()
        .find(|rule| (rule.matches)(mime, extract))
        .map_or(Action::Keep, |rule| rule.action)
}

/// Renames, or expands, the file at `path` according to its sniffed type.
///
/// Resolving an already resolved file is a no-op.
pub fn resolve(path: &Path, mime: &str, extract: bool) -> Result<ResolvedArtifact> {
    let action = classify(mime, extract);
    debug!("Resolving {} ({}) with {:?}", path.display(), mime, action);

    match action {
        Action::Expand => Ok(ResolvedArtifact {
            path: archive::expand(path)?,
            extension: Some(archive::EXTRACTED_EXTENSION.to_string()),
        }),
        Action::Rename(extension) => Ok(ResolvedArtifact {
            path: rename_extension(path, extension)?,
            extension: Some(extension.to_string()),
        }),
        Action::Keep => Ok(ResolvedArtifact {
            path: path.to_path_buf(),
            extension: None,
        }),
    }
}

fn rename_extension(path: &Path, extension: &str) -> Result<PathBuf> {
    let target = path.with_extension(extension);
    if target != path {
        fs::rename(path, &target).map_err(|e| Error::local_io(path, e))?;
    }
    Ok(target)
}
