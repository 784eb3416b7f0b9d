//! HTTP surface for dropzone-saver.
//!
//! `POST /save` stores a multipart upload as a new batch; every other
//! `GET` is served from the static content directory, then the upload
//! root, then a generated directory listing.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_router, locate_static_content};
pub use server::WebServer;
