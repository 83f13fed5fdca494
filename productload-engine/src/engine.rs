//! Orchestration of a complete workload run.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::config::WorkloadConfig;
use crate::counters::{Counters, Summary};
use crate::dispatcher::{Dispatcher, Submission};
use crate::error::{ClientError, ConfigError};
use crate::operations;
use crate::resource::ResourceClient;
use crate::selector::WorkloadSelector;

/// Lifecycle of a run, reported in debug logs.
#[derive(Clone, Copy, Debug)]
enum EngineState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Drives one workload run against a [`ResourceClient`].
///
/// An engine is single-use: [`run`](Self::run) consumes it. Construct a fresh engine for every
/// run.
pub struct WorkloadEngine<C> {
    config: WorkloadConfig,
    client: Arc<C>,
    counters: Arc<Counters>,
}

impl<C> fmt::Debug for WorkloadEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadEngine")
            .field("config", &self.config)
            .field("client", &format_args!("[ResourceClient]"))
            .finish()
    }
}

impl<C: ResourceClient> WorkloadEngine<C> {
    /// Creates an engine after validating the configuration.
    pub fn new(config: WorkloadConfig, client: C) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            client: Arc::new(client),
            counters: Arc::new(Counters::default()),
        })
    }

    /// Runs all iterations and returns the final counters.
    ///
    /// Every iteration draws one workload type and submits its configured number of
    /// invocations. Iterations do not wait for each other; only the dispatcher's concurrency
    /// ceiling throttles submission. Once everything has been joined, the counters are read into
    /// a [`Summary`].
    ///
    /// If an invocation fails, the run fails with that error after all admitted invocations
    /// have finished. Whether later iterations are still submitted depends on the configured
    /// [`FailurePolicy`](crate::FailurePolicy).
    pub async fn run(self) -> Result<Summary, ClientError> {
        transition(EngineState::Idle, EngineState::Running);

        let config = &self.config;
        let mut dispatcher = Dispatcher::new(config.max_concurrency, config.failure_policy);
        let selector = WorkloadSelector::new(config.seed);

        'iterations: for (iteration, workload) in selector.take(config.workload_count).enumerate()
        {
            let repeat = config.repeat_count(workload);
            tracing::trace!(iteration, %workload, repeat, "submitting iteration");

            for _ in 0..repeat {
                let client = Arc::clone(&self.client);
                let counters = Arc::clone(&self.counters);
                let invocation = async move {
                    operations::run_workload(workload, client.as_ref(), &counters).await
                };

                if dispatcher.submit(invocation).await == Submission::Rejected {
                    tracing::debug!(iteration, "failure observed, skipping remaining iterations");
                    break 'iterations;
                }
            }

            self.counters.add_iteration();
        }

        match dispatcher.join_all().await {
            Ok(()) => {
                let summary = self.counters.snapshot();
                transition(EngineState::Running, EngineState::Completed);
                tracing::info!(?summary, "workload completed");
                Ok(summary)
            }
            Err(err) => {
                transition(EngineState::Running, EngineState::Failed);
                tracing::error!(error = &err as &dyn Error, "workload failed");
                Err(err)
            }
        }
    }
}

fn transition(from: EngineState, to: EngineState) {
    tracing::debug!(?from, ?to, "engine state change");
}
