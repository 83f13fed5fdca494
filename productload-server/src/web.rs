//! The web application and a handle to run it in the background.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::Request;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

use crate::endpoints;
use crate::state::ServiceState;
use crate::store::ProductStore;

/// The product service web application.
#[derive(Debug)]
pub struct App {
    router: Router,
}

impl App {
    /// Creates the application router for the given store.
    pub fn new(state: ServiceState) -> Self {
        let router = endpoints::routes()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_http_span)
                    .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
            )
            .with_state(state);

        Self { router }
    }

    /// Serves requests on `listener` until `shutdown` is cancelled.
    ///
    /// In-flight requests are allowed to complete before this future resolves.
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;

        Ok(())
    }
}

/// Create a tracing span for an HTTP request.
fn make_http_span(request: &Request) -> tracing::Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}

/// A product service running on a background task.
///
/// Dropping the handle triggers a graceful shutdown without waiting for it. Use
/// [`shutdown`](Self::shutdown) to wait for the server to stop.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    store: ServiceState,
    shutdown: CancellationToken,
    task: Option<JoinHandle<Result<()>>>,
}

impl ServerHandle {
    /// Binds to `host:port` and starts serving the given store.
    ///
    /// Port `0` binds to a free port; use [`port`](Self::port) to find out which one.
    pub async fn start(host: &str, port: u16, store: ProductStore) -> Result<Self> {
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("failed to bind {host}:{port}"))?;
        let addr = listener.local_addr()?;
        tracing::info!("HTTP server listening on {addr}");

        let store = Arc::new(store);
        let shutdown = CancellationToken::new();
        let app = App::new(Arc::clone(&store));
        let task = tokio::spawn(app.serve(listener, shutdown.clone()));

        Ok(Self {
            addr,
            store,
            shutdown,
            task: Some(task),
        })
    }

    /// Returns the address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the resolved port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Returns a full URL pointing to the given path.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("http://{}/{}", self.addr, path)
    }

    /// Returns the store backing the server.
    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    /// Stops the server, waits for in-flight requests and clears the store.
    pub async fn shutdown(mut self) -> Result<()> {
        self.shutdown.cancel();

        let result = match self.task.take() {
            Some(task) => task.await.context("server task failed")?,
            None => Ok(()),
        };

        self.store.clear();
        tracing::info!("Shutdown complete");
        result
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
