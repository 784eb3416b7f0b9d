//! Router configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{browse, save, AppState};
use crate::config::WebConfig;

/// Find the directory holding the upload page and its assets.
///
/// `static_path` wins when it is a directory, then `fallback`. Returns
/// `None` when neither exists, in which case only uploads are served.
pub fn locate_static_content(static_path: &str, fallback: Option<&str>) -> Option<PathBuf> {
    std::iter::once(static_path)
        .chain(fallback)
        .map(PathBuf::from)
        .find(|dir| dir.is_dir())
}

/// Create the application router.
///
/// `POST /save` accepts uploads. Everything else is looked up in the
/// static content directory, then the upload root, then rendered as a
/// directory listing.
pub fn create_router(app_state: Arc<AppState>, config: &WebConfig) -> Router {
    let body_limit = match config.upload_limit_bytes() {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let listing: MethodRouter = get(browse).with_state(app_state.clone());
    let uploads = ServeDir::new(app_state.store.root()).fallback(listing);

    let router = Router::new().route("/save", post(save).layer(body_limit));

    let router = match locate_static_content(&config.static_path, config.static_fallback.as_deref())
    {
        Some(dir) => {
            tracing::info!("Serving static content from {}", dir.display());
            router.fallback_service(ServeDir::new(dir).fallback(uploads))
        }
        None => {
            tracing::warn!("No static content found, serving uploads only");
            router.fallback_service(uploads)
        }
    };

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(app_state)
}
