//! Test utilities for the product service and the workload engine.
//!
//! This crate provides utilities to facilitate testing of the workload engine against a real
//! product service. See the modules for all available utilities.

pub mod server;
pub mod tracing;
