//! A synthetic workload generator for a CRUD-style product service.
//!
//! The [`WorkloadEngine`] repeatedly draws one of four traffic shapes from a seeded
//! [`WorkloadSelector`]:
//!
//! - *read*: list all products, then fetch each of them,
//! - *write*: create a new product,
//! - *ddos*: list all products ten times in a row,
//! - *mixed*: list, create a product, then fetch it back.
//!
//! Each drawn iteration fans out a configured number of invocations through a [`Dispatcher`],
//! which enforces a hard ceiling on concurrently executing invocations. When all of them have
//! been joined, the shared [`Counters`] are read into a [`Summary`] that can be used to validate
//! the run.
//!
//! The engine only talks to the service through the [`ResourceClient`] trait, so any transport
//! can be plugged in.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod counters;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod operations;
pub mod resource;
pub mod selector;

pub use crate::config::{FailurePolicy, WorkloadConfig, WorkloadConfigBuilder};
pub use crate::counters::{Counters, Summary};
pub use crate::dispatcher::{Dispatcher, Submission};
pub use crate::engine::WorkloadEngine;
pub use crate::error::{ClientError, ClientResult, ConfigError, ValidationError};
pub use crate::resource::{Resource, ResourceClient};
pub use crate::selector::{WorkloadSelector, WorkloadType};
