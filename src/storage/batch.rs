//! Batch directory resolution and the `latest` symlink.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;

use crate::{Result, SaverError};

/// Name of the symlink that tracks the most recent batch.
pub const LATEST_LINK: &str = "latest";

/// Return `root/name`, creating it if absent.
///
/// An existing directory is reused. Anything else occupying the name is an
/// error reporting the bare batch name.
pub async fn ensure_batch_dir(root: &Path, name: &str) -> Result<PathBuf> {
    let dir = root.join(name);

    match fs::metadata(&dir).await {
        Ok(meta) if meta.is_dir() => return Ok(dir),
        Ok(_) => return Err(SaverError::NotADirectory(PathBuf::from(name))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    match create_dir(&dir).await {
        Ok(()) => Ok(dir),
        // Another request created the same batch in the meantime.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(SaverError::NotADirectory(PathBuf::from(name))),
            Err(e) => Err(e.into()),
        },
        Err(e) => Err(e.into()),
    }
}

async fn create_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(0o777);
    builder.create(dir).await
}

/// Point `root/latest` at the batch directory `batch_name`.
///
/// An existing symlink is always replaced. A regular file or directory
/// named `latest` is left untouched and reported as an error.
///
/// The new link is created under a private name and renamed over `latest`,
/// so concurrent refreshes never observe a missing link.
pub async fn refresh_symlink(root: &Path, batch_name: &str) -> Result<()> {
    let link = root.join(LATEST_LINK);

    match fs::symlink_metadata(&link).await {
        Ok(meta) if meta.file_type().is_symlink() => {}
        Ok(_) => return Err(SaverError::NotASymlink(link)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let staged = root.join(staging_name());
    create_link(Path::new(batch_name), &staged).await?;

    if let Err(e) = fs::rename(&staged, &link).await {
        if let Err(cleanup) = remove_link(&staged).await {
            tracing::warn!(link = %staged.display(), "Failed to remove staged link: {}", cleanup);
        }
        return Err(e.into());
    }

    tracing::debug!(link = %link.display(), target = batch_name, "Refreshed latest link");
    Ok(())
}

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

fn staging_name() -> String {
    let n = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(".{LATEST_LINK}.{}.{n}", std::process::id())
}

#[cfg(unix)]
async fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    fs::symlink(target, link).await
}

#[cfg(windows)]
async fn create_link(target: &Path, link: &Path) -> io::Result<()> {
    fs::symlink_dir(target, link).await
}

#[cfg(unix)]
async fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link).await
}

#[cfg(windows)]
async fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_dir(link).await
}
