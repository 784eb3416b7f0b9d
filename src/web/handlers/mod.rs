//! Request handlers.

pub mod browse;
pub mod save;

pub use browse::browse;
pub use save::{save, SUCCESS_BODY};

use std::sync::Arc;

use crate::storage::{Clock, SystemClock, UploadStore};

use super::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload storage.
    pub store: UploadStore,
    /// Time source for batch naming.
    pub clock: Arc<dyn Clock>,
    /// Report malformed input as 400 instead of 500.
    pub client_errors_as_bad_request: bool,
}

impl AppState {
    /// Create state backed by the wall clock.
    pub fn new(store: UploadStore) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            client_errors_as_bad_request: false,
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Choose how malformed multipart input is reported.
    pub fn with_client_errors_as_bad_request(mut self, enabled: bool) -> Self {
        self.client_errors_as_bad_request = enabled;
        self
    }

    /// Error for a request the client got wrong.
    pub(crate) fn client_error(&self, message: String) -> ApiError {
        tracing::error!("{}", message);
        if self.client_errors_as_bad_request {
            ApiError::bad_request(message)
        } else {
            ApiError::internal(message)
        }
    }

    /// Error for a failure on the server side.
    pub(crate) fn server_error(&self, message: String) -> ApiError {
        tracing::error!("{}", message);
        ApiError::internal(message)
    }
}
