//! Web server for dropzone-saver.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{Config, WebConfig};
use crate::storage::{Clock, UploadStore};

use super::handlers::AppState;
use super::router::create_router;

/// Resolve a `host:port` listen address.
///
/// An empty host (`":8080"`) listens on all interfaces. Host names are
/// resolved and the first address wins.
pub async fn resolve_addr(addr: &str) -> std::io::Result<SocketAddr> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    };

    let found = tokio::net::lookup_host(&addr).await?.next();
    found.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("no address found for {addr}"),
        )
    })
}

/// Web server for the upload endpoint.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: AppState,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(addr: SocketAddr, config: &Config) -> Self {
        let store = UploadStore::from_config(&config.storage);
        let app_state = AppState::new(store)
            .with_client_errors_as_bad_request(config.web.client_errors_as_bad_request);

        Self {
            addr,
            app_state,
            web_config: config.web.clone(),
        }
    }

    /// Replace the time source used for batch names.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.app_state = self.app_state.with_clock(clock);
        self
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn bind(self) -> Result<(TcpListener, axum::Router), std::io::Error> {
        let root = self.app_state.store.root();
        let shown = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        tracing::info!("Saving uploads under {}", shown.display());

        let router = create_router(Arc::new(self.app_state), &self.web_config);
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        Ok((listener, router))
    }

    /// Run the web server until the listener fails.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let (listener, router) = self.bind().await?;
        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
