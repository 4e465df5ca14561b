//! What to download and where to put it.
//!
//! ```rust
//! use bulkport::download::{DownloadRequest, ResourceType};
//!
//! let request = DownloadRequest::new("listexport", "1234")?;
//! assert_eq!(request.resource_type, ResourceType::ListExport);
//! assert_eq!(request.segments(), ["listexport", "id", "1234"]);
//! # Ok::<(), bulkport::Error>(())
//! ```

use crate::error::Error;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The kinds of remote resources that can be downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// A file previously uploaded to, or generated by, the service.
    File,
    /// The export of a contact list.
    ListExport,
    /// The export of a data table.
    DataExport,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [
        ResourceType::File,
        ResourceType::ListExport,
        ResourceType::DataExport,
    ];

    /// Path segment naming the resource on the service.
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceType::File => "file",
            ResourceType::ListExport => "listexport",
            ResourceType::DataExport => "dataexport",
        }
    }

    /// Name of the key identifying one resource of this type.
    pub fn primary_key(self) -> &'static str {
        match self {
            ResourceType::File => "key",
            ResourceType::ListExport | ResourceType::DataExport => "id",
        }
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.path_segment() == s)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown resource type \"{}\", expected one of file, listexport, dataexport",
                    s
                ))
            })
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Per-download overrides of the downloader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Expand zip payloads. Defaults to the downloader's setting.
    pub extract: Option<bool>,
    /// Where to create the file. Defaults to the downloader's directory.
    pub directory: Option<PathBuf>,
}

impl DownloadOptions {
    pub fn extract(mut self, extract: bool) -> Self {
        self.extract = Some(extract);
        self
    }

    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// A validated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub resource_type: ResourceType,
    pub primary_id: String,
    pub options: DownloadOptions,
}

impl DownloadRequest {
    /// Creates a request with default options.
    ///
    /// Fails with [`Error::InvalidInput`] for an unknown resource type or an
    /// empty id.
    pub fn new(resource_type: &str, primary_id: &str) -> Result<Self, Error> {
        let resource_type = resource_type.parse()?;
        if primary_id.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "empty {} for a {} download",
                ResourceType::primary_key(resource_type),
                resource_type
            )));
        }

        Ok(Self {
            resource_type,
            primary_id: primary_id.to_string(),
            options: DownloadOptions::default(),
        })
    }

    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }

    /// Remote path of the resource, relative to the service root.
    pub fn segments(&self) -> [&str; 3] {
        [
            self.resource_type.path_segment(),
            self.resource_type.primary_key(),
            &self.primary_id,
        ]
    }

    /// Prefix of the local file name.
    ///
    /// Characters outside `[A-Za-z0-9-]` in the id are replaced so the name
    /// is safe on every platform and carries no extension.
    pub(crate) fn file_prefix(&self) -> String {
        let id: String = self
            .primary_id
            .chars()
            .take(64)
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
                _ => '-',
            })
            .collect();
        format!("{}_{}_", self.resource_type.path_segment(), id)
    }
}
