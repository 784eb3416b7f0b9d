//! Test helpers for HTTP integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use dropzone_saver::config::WebConfig;
use dropzone_saver::{create_router, AppState, BatchNamer, BatchNaming, FixedClock, UploadStore};

/// Batch directory produced by [`upload_instant`].
pub const BATCH: &str = "2024-01-02-03-04";

/// Boundary used by hand-built multipart bodies.
pub const BOUNDARY: &str = "TESTBOUNDARY";

/// The instant every test upload happens at.
pub fn upload_instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 0).unwrap()
}

/// A running test server and the directories behind it.
pub struct TestEnv {
    pub server: TestServer,
    pub root: TempDir,
    pub static_dir: TempDir,
}

impl TestEnv {
    /// Path of the batch directory for [`upload_instant`].
    pub fn batch_dir(&self) -> PathBuf {
        self.root.path().join(BATCH)
    }

    /// Path below the upload root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }
}

/// Options for building a test server.
#[derive(Default)]
pub struct Options {
    pub create_parent_dirs: bool,
    pub latest_symlink: Option<bool>,
    pub client_errors_as_bad_request: bool,
    pub with_static: bool,
    pub max_upload_size_mb: u64,
}

/// Create a test server with default options.
pub fn create_test_server() -> TestEnv {
    create_test_server_with(Options::default())
}

/// Create a test server rooted in fresh temporary directories.
pub fn create_test_server_with(options: Options) -> TestEnv {
    let root = TempDir::new().expect("Failed to create upload root");
    let static_dir = TempDir::new().expect("Failed to create static dir");

    let store = UploadStore::new(root.path())
        .with_namer(BatchNamer::new(BatchNaming::Minute, "UTC"))
        .with_latest_symlink(options.latest_symlink.unwrap_or(true))
        .with_create_parent_dirs(options.create_parent_dirs);

    let state = AppState::new(store)
        .with_clock(FixedClock(upload_instant()))
        .with_client_errors_as_bad_request(options.client_errors_as_bad_request);

    let static_path = if options.with_static {
        std::fs::write(
            static_dir.path().join("index.html"),
            "<html>drop files here</html>",
        )
        .expect("Failed to write index.html");
        static_dir.path().to_path_buf()
    } else {
        static_dir.path().join("missing")
    };

    let config = WebConfig {
        static_path: path_string(&static_path),
        static_fallback: None,
        max_upload_size_mb: options.max_upload_size_mb,
        client_errors_as_bad_request: options.client_errors_as_bad_request,
    };

    let router = create_router(Arc::new(state), &config);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestEnv {
        server,
        root,
        static_dir,
    }
}

fn path_string(path: &Path) -> String {
    path.to_str().expect("temp path is not UTF-8").to_string()
}

/// Build a multipart body by hand, one `(filename, content)` pair per part.
pub fn raw_multipart(parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (filename, content) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Content type matching [`raw_multipart`].
pub fn raw_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
