//! Directory listings for the upload root.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tokio::fs;

use super::AppState;
use crate::storage::sanitize;

/// A single listing entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    name: String,
    is_dir: bool,
}

/// GET /* - List a directory below the upload root.
///
/// Reached only after the static and upload file services found no file,
/// so anything that is not a readable directory is a 404.
pub async fn browse(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Ok(decoded) = urlencoding::decode(uri.path()) else {
        return (StatusCode::BAD_REQUEST, "invalid path\n").into_response();
    };
    let dir = sanitize(state.store.root(), &decoded);

    let mut read_dir = match fs::read_dir(&dir).await {
        Ok(read_dir) => read_dir,
        Err(_) => return (StatusCode::NOT_FOUND, "404 page not found\n").into_response(),
    };

    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                // Follows symlinks so `latest` lists as a directory.
                let is_dir = fs::metadata(entry.path())
                    .await
                    .map(|m| m.is_dir())
                    .unwrap_or(false);
                entries.push(Entry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir,
                });
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!(dir = %dir.display(), "Error reading directory: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "error reading directory\n")
                    .into_response();
            }
        }
    }
    entries.sort();

    Html(render_listing(&entries)).into_response()
}

fn render_listing(entries: &[Entry]) -> String {
    let mut html = String::from("<pre>\n");
    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        html.push_str(&format!(
            "<a href=\"{}{suffix}\">{}{suffix}</a>\n",
            urlencoding::encode(&entry.name),
            escape_html(&entry.name),
        ));
    }
    html.push_str("</pre>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
