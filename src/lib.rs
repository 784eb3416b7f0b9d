//! dropzone-saver
//!
//! A drop-target HTTP endpoint: multipart uploads posted to `/save` are
//! written into a directory named after the time of the upload, and the
//! upload tree is browsable over HTTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{Result, SaverError};
pub use storage::{BatchNamer, BatchNaming, Clock, FixedClock, SystemClock, UploadStore};
pub use web::{create_router, AppState, WebServer};
