//! Streaming a part body to disk.

use std::io;
use std::path::Path;

use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Result;

/// Stream `body` into a newly created (or truncated) file at `path`.
///
/// Chunks are written as they arrive, so the payload is never held in
/// memory as a whole. A failure part-way leaves the truncated file in
/// place. Returns the number of bytes written.
pub async fn write_part<S, B, E>(path: &Path, body: S, create_parents: bool) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if create_parents {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(path).await?;
    let mut body = std::pin::pin!(body);
    let mut written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(io::Error::other)?;
        let bytes = chunk.as_ref();
        file.write_all(bytes).await?;
        written += bytes.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
