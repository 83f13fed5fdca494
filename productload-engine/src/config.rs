//! Configuration of a single workload run.

use std::num::NonZeroUsize;
use std::thread::available_parallelism;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::ConfigError;
use crate::selector::WorkloadType;

/// What the engine does once an invocation has failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop submitting new invocations, let admitted ones finish, then report the first error.
    #[default]
    DrainInFlight,
    /// Keep submitting every iteration and report the first error once all of them finished.
    CompleteAll,
}

/// Immutable parameters of a workload run.
///
/// Use [`WorkloadConfig::builder`] to start from the defaults, or deserialize it from a
/// configuration file. Invalid values are rejected by [`WorkloadEngine::new`](crate::WorkloadEngine::new).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Host of the product service.
    pub host: String,
    /// Port of the product service. `0` means the embedding harness resolves it later.
    pub port: u16,

    /// Invocations per iteration that selected [`WorkloadType::Read`].
    pub read_repeat_count: usize,
    /// Invocations per iteration that selected [`WorkloadType::Write`].
    pub write_repeat_count: usize,
    /// Invocations per iteration that selected [`WorkloadType::Ddos`].
    pub ddos_repeat_count: usize,
    /// Invocations per iteration that selected [`WorkloadType::Mixed`].
    pub mixed_repeat_count: usize,

    /// Number of iterations, each drawing one workload type.
    pub workload_count: usize,
    /// Hard ceiling on concurrently executing invocations.
    pub max_concurrency: usize,
    /// Seed of the workload selector.
    pub seed: u64,
    /// Behavior after the first failed invocation.
    pub failure_policy: FailurePolicy,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 0,

            read_repeat_count: 5,
            write_repeat_count: 5,
            ddos_repeat_count: 5,
            mixed_repeat_count: 5,

            workload_count: 450,
            max_concurrency: available_parallelism().map_or(1, NonZeroUsize::get),
            seed: 42,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl WorkloadConfig {
    /// Creates a builder starting from the default configuration.
    pub fn builder() -> WorkloadConfigBuilder {
        WorkloadConfigBuilder {
            config: Self::default(),
        }
    }

    /// Returns the number of invocations submitted for an iteration of the given type.
    pub fn repeat_count(&self, workload: WorkloadType) -> usize {
        match workload {
            WorkloadType::Read => self.read_repeat_count,
            WorkloadType::Write => self.write_repeat_count,
            WorkloadType::Ddos => self.ddos_repeat_count,
            WorkloadType::Mixed => self.mixed_repeat_count,
        }
    }

    /// Checks the invariants that cannot be expressed in the field types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigError::ConcurrencyTooLarge {
                max: Semaphore::MAX_PERMITS,
            });
        }
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(())
    }
}

/// A builder for creating a [`WorkloadConfig`].
#[derive(Debug)]
pub struct WorkloadConfigBuilder {
    config: WorkloadConfig,
}

impl WorkloadConfigBuilder {
    /// The host and port of the product service.
    pub fn target(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.host = host.into();
        self.config.port = port;
        self
    }

    /// Invocations per iteration for each workload type.
    pub fn repeat_counts(mut self, read: usize, write: usize, ddos: usize, mixed: usize) -> Self {
        self.config.read_repeat_count = read;
        self.config.write_repeat_count = write;
        self.config.ddos_repeat_count = ddos;
        self.config.mixed_repeat_count = mixed;
        self
    }

    /// The number of iterations.
    pub fn workload_count(mut self, count: usize) -> Self {
        self.config.workload_count = count;
        self
    }

    /// The maximum number of concurrently executing invocations.
    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.config.max_concurrency = max;
        self
    }

    /// The seed driving workload selection.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// The behavior after the first failed invocation.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Returns the configuration.
    pub fn build(self) -> WorkloadConfig {
        self.config
    }
}
