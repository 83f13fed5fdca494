//! Exposes an in-process test server for use in integration tests.
//!
//! ```
//! use productload_test::server::TestServer;
//!
//! #[tokio::main]
//! async fn main() {
//!    let server = TestServer::new().await;
//!    let url = server.url("/health");
//!    // use the URL in tests...
//! }
//! ```

use std::ops::Deref;

use productload_server::{ProductStore, ServerHandle};

/// An in-process test server for use in integration tests.
///
/// This server runs the full product service with an in-memory store. It listens on a random
/// available port on `127.0.0.1` and shuts down when dropped.
#[derive(Debug)]
pub struct TestServer {
    handle: ServerHandle,
}

impl TestServer {
    /// Starts a server with an empty store.
    pub async fn new() -> Self {
        Self::with_products(0).await
    }

    /// Starts a server pre-populated with `count` generated products.
    pub async fn with_products(count: usize) -> Self {
        let store = ProductStore::with_initial(count);
        let handle = ServerHandle::start("127.0.0.1", 0, store).await.unwrap();
        Self { handle }
    }
}

impl Deref for TestServer {
    type Target = ServerHandle;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}
