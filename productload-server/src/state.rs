//! Shared state of the product service.

use std::sync::Arc;

use crate::store::ProductStore;

/// Shared reference to the product store.
///
/// In request handlers, use `axum::extract::State<ServiceState>` to retrieve it.
pub type ServiceState = Arc<ProductStore>;
