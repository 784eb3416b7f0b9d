//! Upload storage for dropzone-saver.
//!
//! Each upload request lands in a batch directory under the storage root:
//! ```text
//! {root}/
//! ├── 2024-01-02-03-04/
//! │   ├── a.txt
//! │   └── notes/todo.txt
//! ├── 2024-01-02-03-05/
//! │   └── b.png
//! └── latest -> 2024-01-02-03-05
//! ```

mod batch;
mod namer;
mod sanitize;
mod writer;

pub use batch::{ensure_batch_dir, refresh_symlink, LATEST_LINK};
pub use namer::{BatchNamer, BatchNaming, Clock, FixedClock, SystemClock, MINUTE_FORMAT};
pub use sanitize::{clean_path, sanitize};
pub use writer::write_part;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::Stream;

use crate::config::StorageConfig;
use crate::Result;

/// Storage settings shared by every upload request.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    namer: BatchNamer,
    latest_symlink: bool,
    create_parent_dirs: bool,
}

impl UploadStore {
    /// Create a store rooted at `root` with default behaviour.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&StorageConfig::default()).with_root(root)
    }

    /// Create a store from configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            namer: BatchNamer::new(config.naming, &config.timezone),
            latest_symlink: config.latest_symlink,
            create_parent_dirs: config.create_parent_dirs,
        }
    }

    /// Replace the storage root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Replace the batch namer.
    pub fn with_namer(mut self, namer: BatchNamer) -> Self {
        self.namer = namer;
        self
    }

    /// Enable or disable the `latest` symlink.
    pub fn with_latest_symlink(mut self, enabled: bool) -> Self {
        self.latest_symlink = enabled;
        self
    }

    /// Enable or disable creating intermediate directories for nested names.
    pub fn with_create_parent_dirs(mut self, enabled: bool) -> Self {
        self.create_parent_dirs = enabled;
        self
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the `latest` symlink is maintained.
    pub fn latest_symlink(&self) -> bool {
        self.latest_symlink
    }

    /// Batch directory name for `now`.
    pub fn batch_name(&self, now: DateTime<Utc>) -> String {
        self.namer.name_for(now)
    }

    /// Resolve (creating if needed) the batch directory called `name`.
    pub async fn ensure_batch_dir(&self, name: &str) -> Result<PathBuf> {
        ensure_batch_dir(&self.root, name).await
    }

    /// Point `latest` at the batch directory called `name`.
    pub async fn refresh_latest(&self, name: &str) -> Result<()> {
        refresh_symlink(&self.root, name).await
    }

    /// On-disk path for a client-supplied filename inside `batch_dir`.
    pub fn part_path(&self, batch_dir: &Path, filename: &str) -> PathBuf {
        sanitize(batch_dir, filename)
    }

    /// Stream one part body to `path`.
    pub async fn write_part<S, B, E>(&self, path: &Path, body: S) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        write_part(path, body, self.create_parent_dirs).await
    }
}
