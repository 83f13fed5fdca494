//! Shared operation counters and the summary produced from them.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::ValidationError;
use crate::selector::WorkloadType;

/// Monotonic counters shared by all invocations of one run.
///
/// All updates are atomic `fetch_add`s. Readers must only call [`snapshot`](Self::snapshot) once
/// every invocation has been joined; the engine guarantees this.
#[derive(Debug, Default)]
pub struct Counters {
    list: AtomicU64,
    get: AtomicU64,
    create: AtomicU64,

    read: AtomicU64,
    write: AtomicU64,
    ddos: AtomicU64,
    mixed: AtomicU64,

    iterations: AtomicU64,
}

impl Counters {
    /// Records `count` list calls.
    pub fn add_lists(&self, count: u64) {
        self.list.fetch_add(count, Ordering::Relaxed);
    }

    /// Records one get-by-id call.
    pub fn add_get(&self) {
        self.get.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one create call.
    pub fn add_create(&self) {
        self.create.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one completed invocation of the given workload type.
    pub fn add_workload(&self, workload: WorkloadType) {
        let counter = match workload {
            WorkloadType::Read => &self.read,
            WorkloadType::Write => &self.write,
            WorkloadType::Ddos => &self.ddos,
            WorkloadType::Mixed => &self.mixed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one iteration, regardless of how many invocations it submitted.
    pub fn add_iteration(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters into a [`Summary`].
    pub fn snapshot(&self) -> Summary {
        Summary {
            list_count: self.list.load(Ordering::Acquire),
            get_count: self.get.load(Ordering::Acquire),
            create_count: self.create.load(Ordering::Acquire),
            read_count: self.read.load(Ordering::Acquire),
            write_count: self.write.load(Ordering::Acquire),
            ddos_count: self.ddos.load(Ordering::Acquire),
            mixed_count: self.mixed.load(Ordering::Acquire),
            total_iterations: self.iterations.load(Ordering::Acquire),
        }
    }
}

/// Immutable result of a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Summary {
    /// Number of list calls issued.
    pub list_count: u64,
    /// Number of get-by-id calls issued.
    pub get_count: u64,
    /// Number of create calls issued.
    pub create_count: u64,

    /// Completed read invocations.
    pub read_count: u64,
    /// Completed write invocations.
    pub write_count: u64,
    /// Completed ddos invocations.
    pub ddos_count: u64,
    /// Completed mixed invocations.
    pub mixed_count: u64,

    /// Number of iterations drawn from the selector.
    pub total_iterations: u64,
}

impl Summary {
    /// Returns the completed invocation count for a workload type.
    pub fn workload_count(&self, workload: WorkloadType) -> u64 {
        match workload {
            WorkloadType::Read => self.read_count,
            WorkloadType::Write => self.write_count,
            WorkloadType::Ddos => self.ddos_count,
            WorkloadType::Mixed => self.mixed_count,
        }
    }

    /// Checks that the run performed the expected number of iterations.
    pub fn validate(&self, expected_iterations: u64) -> Result<(), ValidationError> {
        if self.total_iterations != expected_iterations {
            return Err(ValidationError {
                expected: expected_iterations,
                actual: self.total_iterations,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn snapshot_reflects_increments() {
        let counters = Counters::default();
        counters.add_lists(10);
        counters.add_get();
        counters.add_create();
        counters.add_workload(WorkloadType::Ddos);
        counters.add_iteration();

        let summary = counters.snapshot();
        assert_eq!(summary.list_count, 10);
        assert_eq!(summary.get_count, 1);
        assert_eq!(summary.create_count, 1);
        assert_eq!(summary.workload_count(WorkloadType::Ddos), 1);
        assert_eq!(summary.workload_count(WorkloadType::Read), 0);
        assert_eq!(summary.total_iterations, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let counters = Arc::new(Counters::default());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let counters = Arc::clone(&counters);
                tokio::spawn(async move {
                    for _ in 0..1000 {
                        counters.add_get();
                        counters.add_workload(WorkloadType::Read);
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        let summary = counters.snapshot();
        assert_eq!(summary.get_count, 8000);
        assert_eq!(summary.read_count, 8000);
    }

    #[test]
    fn validate_checks_iterations() {
        let summary = Summary {
            total_iterations: 3,
            ..Default::default()
        };

        assert_eq!(summary.validate(3), Ok(()));
        assert_eq!(
            summary.validate(4),
            Err(ValidationError {
                expected: 4,
                actual: 3
            })
        );
    }
}
