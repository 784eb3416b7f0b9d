//! Upload handler.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};

use super::AppState;
use crate::web::error::ApiError;

/// Body sent when every part was stored.
pub const SUCCESS_BODY: &str = "all done!";

/// POST /save - Store every part of a multipart upload in the current batch.
///
/// The batch directory (and `latest` link) is prepared before the first
/// part is read, so an upload with no parts still creates it. Processing
/// stops at the first failure; parts already written stay on disk.
pub async fn save(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, ApiError> {
    let mut multipart =
        multipart.map_err(|e| state.client_error(format!("error parsing form: {e}")))?;

    let store = &state.store;
    let batch = store.batch_name(state.clock.now());

    let dir = store
        .ensure_batch_dir(&batch)
        .await
        .map_err(|e| state.server_error(format!("error creating directory: {e}")))?;

    if store.latest_symlink() {
        store
            .refresh_latest(&batch)
            .await
            .map_err(|e| state.server_error(format!("error creating symlink: {e}")))?;
    }

    let mut parts = 0usize;
    let mut bytes = 0u64;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(state.client_error(format!("error reading: {e}"))),
        };

        let filename = field.file_name().unwrap_or_default().to_string();
        let path = store.part_path(&dir, &filename);

        let written = store.write_part(&path, field).await.map_err(|e| {
            state.server_error(format!("couldn't write {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), bytes = written, "Stored part");
        parts += 1;
        bytes += written;
    }

    tracing::info!(batch = %dir.display(), parts, bytes, "Upload stored");
    Ok(SUCCESS_BODY)
}
