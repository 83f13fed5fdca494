//! Contains all HTTP endpoint handlers.
//!
//! Use [`routes`] to create a router with all endpoints.

use axum::Router;

use crate::state::ServiceState;

pub mod common;
mod health;
mod products;

/// Creates the router for all endpoints of the product service.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
}
