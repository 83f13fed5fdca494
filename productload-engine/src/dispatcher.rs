//! Bounded fan-out of workload invocations.
//!
//! [`Dispatcher`] caps the number of concurrently executing invocations using a tokio semaphore.
//! A permit is acquired *before* an invocation is spawned and travels with the spawned task, so
//! the ceiling holds no matter how many invocations are submitted at once. Waiters on the
//! semaphore are served in FIFO order, which makes admission follow submission order.
//!
//! The first failing invocation is recorded. Depending on the [`FailurePolicy`], it also stops
//! further admissions, while invocations that are already running are always allowed to finish.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::{fmt, panic};

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::config::FailurePolicy;

/// Outcome of [`Dispatcher::submit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The invocation acquired a slot and is running.
    Started,
    /// A failure has been observed and the invocation was dropped without running.
    Rejected,
}

/// Runs submitted invocations with at most `max_concurrency` of them in flight.
pub struct Dispatcher<E> {
    semaphore: Arc<Semaphore>,
    max: usize,
    policy: FailurePolicy,
    tasks: JoinSet<()>,
    first_error: Arc<Mutex<Option<E>>>,
    failed: CancellationToken,
}

impl<E> fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("max", &self.max)
            .field("in_flight", &self.in_flight())
            .field("policy", &self.policy)
            .field("tasks", &self.tasks.len())
            .field("failed", &self.failed.is_cancelled())
            .finish()
    }
}

impl<E> Dispatcher<E> {
    /// Creates a dispatcher with the given concurrency ceiling.
    ///
    /// `max_concurrency` must be at least 1, which [`WorkloadConfig::validate`] ensures.
    ///
    /// [`WorkloadConfig::validate`]: crate::WorkloadConfig::validate
    pub fn new(max_concurrency: usize, policy: FailurePolicy) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max: max_concurrency,
            policy,
            tasks: JoinSet::new(),
            first_error: Arc::new(Mutex::new(None)),
            failed: CancellationToken::new(),
        }
    }

    /// Returns the number of invocations currently executing.
    pub fn in_flight(&self) -> usize {
        self.max - self.semaphore.available_permits()
    }

    /// Returns `true` once a failure has stopped admissions.
    ///
    /// This never becomes `true` under [`FailurePolicy::CompleteAll`].
    pub fn is_stopped(&self) -> bool {
        self.failed.is_cancelled()
    }
}

impl<E: Send + 'static> Dispatcher<E> {
    /// Waits for a free slot and starts the invocation on it.
    ///
    /// Submitters queue on the slot in FIFO order. If admissions are stopped while waiting, the
    /// invocation is dropped and [`Submission::Rejected`] is returned.
    pub async fn submit<F>(&mut self, invocation: F) -> Submission
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
    {
        self.reap_finished();

        let permit = tokio::select! {
            biased;
            _ = self.failed.cancelled() => return Submission::Rejected,
            permit = Arc::clone(&self.semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                // The semaphore is never closed.
                Err(_) => return Submission::Rejected,
            },
        };

        let first_error = Arc::clone(&self.first_error);
        let failed = match self.policy {
            FailurePolicy::DrainInFlight => Some(self.failed.clone()),
            FailurePolicy::CompleteAll => None,
        };

        self.tasks.spawn(async move {
            if let Err(err) = invocation.await {
                first_error.lock().unwrap().get_or_insert(err);
                // Stop admissions before the slot is handed to the next waiter.
                if let Some(failed) = failed {
                    failed.cancel();
                }
            }
            drop(permit);
        });

        Submission::Started
    }

    /// Waits until every started invocation has finished.
    ///
    /// Returns the first error reported by any invocation. A panicking invocation is resumed on
    /// the caller.
    pub async fn join_all(&mut self) -> Result<(), E> {
        while let Some(result) = self.tasks.join_next().await {
            propagate_panic(result);
        }

        match self.first_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn reap_finished(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            propagate_panic(result);
        }
    }
}

fn propagate_panic(result: Result<(), JoinError>) {
    match result {
        Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
        _ => {}
    }
}
