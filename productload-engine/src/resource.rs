//! The product resource and the client capability used to reach the service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientResult;

/// A product as stored by the service.
///
/// Identifiers are generated by the caller and never reused. Resources are never updated or
/// deleted by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Resource {
    /// Opaque unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Resource {
    /// Creates a new product with a random UUID identifier and a name derived from it.
    pub fn generate() -> Self {
        let id = Uuid::new_v4().to_string();
        let name = format!("Product {id}");
        Self { id, name }
    }
}

/// The operations the engine needs from the product service.
///
/// Implementations own the transport, the wire format and any timeout policy. Every call may
/// suspend; none of them may block the runtime.
#[async_trait::async_trait]
pub trait ResourceClient: Send + Sync + 'static {
    /// Lists all resources currently stored.
    async fn list(&self) -> ClientResult<Vec<Resource>>;

    /// Fetches a single resource by identifier.
    ///
    /// Fails with [`ClientError::NotFound`](crate::ClientError::NotFound) if it does not exist.
    async fn get(&self, id: &str) -> ClientResult<Resource>;

    /// Stores a resource so that it becomes retrievable by its identifier.
    async fn create(&self, resource: &Resource) -> ClientResult<()>;
}

#[async_trait::async_trait]
impl<C: ResourceClient> ResourceClient for Arc<C> {
    async fn list(&self) -> ClientResult<Vec<Resource>> {
        (**self).list().await
    }

    async fn get(&self, id: &str) -> ClientResult<Resource> {
        (**self).get(id).await
    }

    async fn create(&self, resource: &Resource) -> ClientResult<()> {
        (**self).create(resource).await
    }
}
