//! Error types for the workload engine and its collaborators.

use std::error::Error;

use thiserror::Error;

/// Errors rejecting a [`WorkloadConfig`](crate::WorkloadConfig) at engine construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The concurrency ceiling must allow at least one invocation.
    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,

    /// The concurrency ceiling exceeds what a tokio semaphore can hold.
    #[error("max_concurrency must be at most {max}")]
    ConcurrencyTooLarge {
        /// The largest accepted ceiling.
        max: usize,
    },

    /// The target host is required to build request URLs.
    #[error("host must not be empty")]
    EmptyHost,
}

/// Errors reported by a [`ResourceClient`](crate::ResourceClient).
///
/// The engine never inspects or retries these. The first one observed during a run is returned
/// unchanged from [`WorkloadEngine::run`](crate::WorkloadEngine::run).
#[derive(Debug, Error)]
pub enum ClientError {
    /// No resource with the given identifier exists on the server.
    #[error("resource `{id}` not found")]
    NotFound {
        /// The identifier that was requested.
        id: String,
    },

    /// Any network or protocol failure while talking to the service.
    #[error("transport error: {context}")]
    Transport {
        /// What the client was doing when the failure happened.
        context: String,
        #[source]
        cause: Box<dyn Error + Send + Sync>,
    },
}

impl ClientError {
    /// Creates a [`ClientError::Transport`] with the given context.
    pub fn transport(
        context: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            context: context.into(),
            cause: cause.into(),
        }
    }
}

/// Result type for [`ResourceClient`](crate::ResourceClient) calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// A [`Summary`](crate::Summary) did not match the expected iteration count.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("workload count mismatch: expected {expected}, got {actual}")]
pub struct ValidationError {
    /// The configured number of iterations.
    pub expected: u64,
    /// The number of iterations the run reported.
    pub actual: u64,
}
