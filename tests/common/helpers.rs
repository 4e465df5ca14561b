#![allow(dead_code)]

use async_trait::async_trait;
use bulkport::transport::{FileHandle, RemoteBody, Transport, UploadForm};
use bulkport::{DownloaderBuilder, Downloader, Error, Result};
use bytes::Bytes;
use futures::stream;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use std::collections::HashMap;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::EnvFilter;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

// Common test constants
pub const TEST_FILE_KEY: &str = "k-7f3a9c";
pub const TEST_CSV: &[u8] = b"id,email,name\n1,ada@example.com,Ada\n2,alan@example.com,\"Turing, Alan\"\n";

/// Installs a subscriber printing through the test harness. `RUST_LOG`
/// selects what is shown.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A log event as seen by [`EventLog`].
#[derive(Debug, Clone, Default)]
pub struct LoggedEvent {
    pub level: String,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl LoggedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

struct EventVisitor<'a>(&'a mut LoggedEvent);

impl Visit for EventVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{:?}", value));
    }
}

impl EventVisitor<'_> {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.0.message = value;
        } else {
            self.0.fields.insert(field.name().to_string(), value);
        }
    }
}

/// Layer recording every event emitted on the current thread.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<LoggedEvent>>>);

impl EventLog {
    /// Installs the log as the thread's default subscriber until the guard
    /// is dropped.
    pub fn install() -> (Self, DefaultGuard) {
        let log = Self::default();
        let guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(log.clone()));
        (log, guard)
    }

    /// Events at INFO with the given message, in emission order.
    pub fn info(&self, message: &str) -> Vec<LoggedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == "INFO" && e.message == message)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut logged = LoggedEvent {
            level: event.metadata().level().to_string(),
            ..Default::default()
        };
        event.record(&mut EventVisitor(&mut logged));
        self.0.lock().unwrap().push(logged);
    }
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates `rows` lines of comma separated data, header included.
pub fn create_csv_content(rows: usize) -> Vec<u8> {
    let mut content = b"id,email,score\n".to_vec();
    for i in 0..rows {
        content.extend_from_slice(format!("{},user{}@example.com,{}\n", i, i, i % 100).as_bytes());
    }
    content
}

/// Creates a zip archive holding `entries`, in order.
pub fn create_zip(entries: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(method);
    for (name, content) in entries {
        writer.start_file(*name, options).expect("Failed to start zip entry");
        writer.write_all(content).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Creates a stored zip whose single member no longer matches its checksum.
pub fn create_corrupt_zip(name: &str, content: &[u8]) -> Vec<u8> {
    let mut archive = create_zip(&[(name, content)], CompressionMethod::Stored);
    // Local header (30 bytes) and name precede the data.
    archive[30 + name.len()] ^= 0xFF;
    archive
}

/// Lists the names of the files in `dir`, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

/// Creates a downloader without progress bar writing into `dir`.
pub fn create_test_downloader<T: Transport>(transport: T, dir: &Path) -> Downloader<T> {
    DownloaderBuilder::hidden()
        .directory(dir.to_path_buf())
        .build(transport)
}

// === Transport double ===

/// Error as produced by the HTTP stack when the service is unreachable.
pub fn transport_error(message: &str) -> Error {
    reqwest_middleware::Error::middleware(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        message.to_string(),
    ))
    .into()
}

/// A call received by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Initialise,
    Upload {
        method: String,
        key: String,
        file_name: String,
        mime: String,
        length: u64,
        content: Vec<u8>,
    },
    Get {
        segments: Vec<String>,
        accept: String,
    },
}

/// How [`MockTransport`] answers a GET.
#[derive(Debug, Clone)]
pub enum Body {
    /// The chunks, in order.
    Chunks(Vec<Bytes>),
    /// The request cannot be sent.
    Unreachable,
    /// The chunks, then a broken connection.
    BrokenAfter(Vec<Bytes>),
}

/// In-memory [`Transport`] recording what it is asked to do.
#[derive(Debug, Clone)]
pub struct MockTransport {
    key: Option<String>,
    upload_fails: bool,
    body: Body,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockTransport {
    /// A service issuing [`TEST_FILE_KEY`] and serving `content`.
    pub fn serving(content: &[u8]) -> Self {
        Self::with_body(Body::Chunks(split_chunks(content, 1024)))
    }

    pub fn with_body(body: Body) -> Self {
        Self {
            key: Some(TEST_FILE_KEY.to_string()),
            upload_fails: false,
            body,
            calls: Arc::default(),
        }
    }

    /// A service nothing can be sent to.
    pub fn unreachable() -> Self {
        Self {
            key: None,
            upload_fails: true,
            body: Body::Unreachable,
            calls: Arc::default(),
        }
    }

    /// A service issuing keys but rejecting uploads.
    pub fn rejecting_uploads() -> Self {
        Self {
            upload_fails: true,
            ..Self::serving(b"")
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Splits `content` into chunks of at most `size` bytes.
pub fn split_chunks(content: &[u8], size: usize) -> Vec<Bytes> {
    content
        .chunks(size)
        .map(|chunk| Bytes::copy_from_slice(chunk))
        .collect()
}

#[async_trait]
impl Transport for MockTransport {
    async fn initialise(&self) -> Result<FileHandle> {
        self.record(Call::Initialise);
        match self.key {
            Some(ref key) => Ok(FileHandle::new(key.clone())),
            None => Err(transport_error("connection refused")),
        }
    }

    async fn post_multipart(&self, mut form: UploadForm) -> Result<()> {
        let mut content = Vec::new();
        form.file
            .read_to_end(&mut content)
            .await
            .expect("Failed to read upload");
        self.record(Call::Upload {
            method: form.method.to_string(),
            key: form.key.to_string(),
            file_name: form.file_name,
            mime: form.mime,
            length: form.length,
            content,
        });

        match self.upload_fails {
            true => Err(transport_error("connection reset by peer")),
            false => Ok(()),
        }
    }

    async fn get_stream(&self, segments: &[&str], accept: &str) -> Result<RemoteBody> {
        self.record(Call::Get {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            accept: accept.to_string(),
        });

        let items: Vec<Result<Bytes>> = match self.body {
            Body::Unreachable => return Err(transport_error("connection refused")),
            Body::Chunks(ref chunks) => chunks.iter().cloned().map(Ok).collect(),
            Body::BrokenAfter(ref chunks) => chunks
                .iter()
                .cloned()
                .map(Ok)
                .chain(std::iter::once(Err(transport_error("connection reset"))))
                .collect(),
        };

        Ok(RemoteBody {
            content_length: None,
            stream: Box::pin(stream::iter(items)),
        })
    }
}
