//! Content-based MIME type detection.
//!
//! The type of a file is decided from its leading bytes only, never from its
//! name or from anything a server claimed about it.

use crate::error::{Error, Result};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 8192;

pub const MIME_EMPTY: &str = "application/x-empty";
pub const MIME_CSV: &str = "text/csv";
pub const MIME_PLAIN: &str = "text/plain";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

const CSV_DELIMITERS: [char; 2] = [',', ';'];

/// Returns the MIME type of the file at `path`, judged by its content.
///
/// Fails with [`Error::Detection`] when the file cannot be read at all; an
/// unrecognised format is reported as `application/octet-stream`.
pub fn sniff(path: &Path) -> Result<String> {
    let detection = |e: std::io::Error| Error::Detection {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::open(path).map_err(detection)?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .map_err(detection)?;

    let mime = sniff_bytes(&head, head.len() < SNIFF_LEN);
    debug!("Sniffed {} as {}", path.display(), mime);
    Ok(mime)
}

/// Classifies the head of a file.
///
/// `complete` tells whether `head` holds the whole file; when it does not,
/// the last line and a trailing partial UTF-8 sequence are not held against
/// the content.
pub fn sniff_bytes(head: &[u8], complete: bool) -> String {
    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }

    if head.is_empty() {
        return MIME_EMPTY.to_string();
    }

    match as_text(head, complete) {
        Some(text) if looks_like_csv(text, complete) => MIME_CSV.to_string(),
        Some(_) => MIME_PLAIN.to_string(),
        None => MIME_OCTET_STREAM.to_string(),
    }
}

fn as_text(head: &[u8], complete: bool) -> Option<&str> {
    if head.contains(&0) {
        return None;
    }

    match std::str::from_utf8(head) {
        Ok(text) => Some(text),
        // A multi-byte character cut by the read limit.
        Err(e) if !complete && e.error_len().is_none() => {
            std::str::from_utf8(&head[..e.valid_up_to()]).ok()
        }
        Err(_) => None,
    }
}

fn looks_like_csv(text: &str, complete: bool) -> bool {
    let text = match complete {
        true => text,
        false => text.rsplit_once('\n').map_or("", |(lines, _)| lines),
    };
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return false;
    }

    CSV_DELIMITERS.iter().any(|&delimiter| {
        let fields = field_count(lines[0], delimiter);
        fields >= 2 && lines[1..].iter().all(|line| field_count(line, delimiter) == fields)
    })
}

/// Counts the fields of a line, ignoring delimiters inside double quotes.
fn field_count(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    let mut count = 1;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            count += 1;
        }
    }

    count
}
