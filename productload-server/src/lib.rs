//! The product service used as the target of workload runs.
//!
//! This is a small CRUD-style HTTP service over an in-memory [`ProductStore`]. It exposes:
//!
//! - `GET /product`: list all products,
//! - `GET /product/{id}`: fetch a single product, or `404` if it does not exist,
//! - `POST /product`: store the JSON-encoded product in the body, responding with `201`,
//! - `GET /health`: liveness probe.
//!
//! Use [`ServerHandle::start`] to bind and run the service in the background.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod endpoints;
pub mod state;
pub mod store;
pub mod web;

pub use crate::store::ProductStore;
pub use crate::web::{App, ServerHandle};
