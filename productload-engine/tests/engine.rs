use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use productload_engine::{
    ClientError, ClientResult, FailurePolicy, Resource, ResourceClient, Summary, WorkloadConfig,
    WorkloadEngine, WorkloadSelector, WorkloadType,
};

/// An in-memory product service that records how many calls run at the same time.
#[derive(Debug, Default)]
struct FakeClient {
    products: Mutex<BTreeMap<String, Resource>>,
    /// When set, `list` always returns this snapshot instead of the live store.
    frozen_listing: Option<Vec<Resource>>,
    /// The 1-based create call that should fail.
    fail_create_on: Option<usize>,

    creates: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    finished: AtomicUsize,
}

struct CallGuard<'a>(&'a FakeClient);

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
        self.0.finished.fetch_add(1, Ordering::SeqCst);
    }
}

impl FakeClient {
    fn with_products(count: usize) -> Self {
        let client = Self::default();
        {
            let mut products = client.products.lock().unwrap();
            for _ in 0..count {
                let product = Resource::generate();
                products.insert(product.id.clone(), product);
            }
        }
        client
    }

    fn frozen(mut self) -> Self {
        self.frozen_listing = Some(self.products.lock().unwrap().values().cloned().collect());
        self
    }

    fn fail_create_on(mut self, call: usize) -> Self {
        self.fail_create_on = Some(call);
        self
    }

    async fn enter(&self) -> CallGuard<'_> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
        let guard = CallGuard(self);
        // Let other invocations interleave while this call is "on the wire".
        tokio::task::yield_now().await;
        guard
    }
}

#[async_trait::async_trait]
impl ResourceClient for FakeClient {
    async fn list(&self) -> ClientResult<Vec<Resource>> {
        let _guard = self.enter().await;
        if let Some(listing) = &self.frozen_listing {
            return Ok(listing.clone());
        }
        Ok(self.products.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: &str) -> ClientResult<Resource> {
        let _guard = self.enter().await;
        self.products
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound { id: id.to_owned() })
    }

    async fn create(&self, resource: &Resource) -> ClientResult<()> {
        let _guard = self.enter().await;
        let call = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_create_on == Some(call) {
            return Err(ClientError::transport(
                "creating product",
                format!("injected failure on call {call}"),
            ));
        }
        self.products
            .lock()
            .unwrap()
            .insert(resource.id.clone(), resource.clone());
        Ok(())
    }
}

/// Finds a seed whose first draw is the given workload type.
fn seed_for(workload: WorkloadType) -> u64 {
    (0..)
        .find(|&seed| WorkloadSelector::new(seed).next_workload() == workload)
        .unwrap()
}

async fn run(config: WorkloadConfig, client: FakeClient) -> ClientResult<Summary> {
    WorkloadEngine::new(config, client).unwrap().run().await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn identical_configs_produce_identical_summaries() {
    productload_test::tracing::init();

    let config = WorkloadConfig::builder()
        .repeat_counts(3, 2, 2, 2)
        .workload_count(40)
        .max_concurrency(8)
        .seed(1234)
        .build();

    let first = run(config.clone(), FakeClient::with_products(5).frozen())
        .await
        .unwrap();
    let second = run(config, FakeClient::with_products(5).frozen())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn serialized_runs_are_reproducible_with_live_store() {
    let config = WorkloadConfig::builder()
        .repeat_counts(2, 2, 1, 2)
        .workload_count(25)
        .max_concurrency(1)
        .seed(7)
        .build();

    let first = run(config.clone(), FakeClient::with_products(2)).await.unwrap();
    let second = run(config, FakeClient::with_products(2)).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn summary_matches_selected_sequence() {
    let config = WorkloadConfig::builder()
        .repeat_counts(2, 3, 1, 4)
        .workload_count(60)
        .max_concurrency(6)
        .seed(99)
        .build();

    let summary = run(config.clone(), FakeClient::with_products(3))
        .await
        .unwrap();

    assert_eq!(summary.total_iterations, 60);
    summary.validate(60).unwrap();

    let sequence = WorkloadSelector::sequence(config.seed, config.workload_count);
    for workload in WorkloadType::ALL {
        let iterations = sequence.iter().filter(|w| **w == workload).count();
        let expected = (iterations * config.repeat_count(workload)) as u64;
        assert_eq!(summary.workload_count(workload), expected, "{workload}");
    }

    assert_eq!(
        summary.create_count,
        summary.write_count + summary.mixed_count
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_repeat_counts_sum_to_iterations() {
    let config = WorkloadConfig::builder()
        .repeat_counts(1, 1, 1, 1)
        .workload_count(100)
        .max_concurrency(4)
        .seed(5)
        .build();

    let summary = run(config, FakeClient::default()).await.unwrap();

    assert_eq!(
        summary.read_count + summary.write_count + summary.ddos_count + summary.mixed_count,
        summary.total_iterations
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ddos_lists_ten_times_per_invocation() {
    let config = WorkloadConfig::builder()
        .repeat_counts(0, 0, 3, 0)
        .workload_count(50)
        .max_concurrency(4)
        .seed(3)
        .build();

    let summary = run(config, FakeClient::with_products(1)).await.unwrap();

    assert!(summary.ddos_count > 0);
    assert_eq!(summary.list_count, 10 * summary.ddos_count);
    assert_eq!(summary.get_count, 0);
    assert_eq!(summary.total_iterations, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrency_ceiling_holds() {
    for max_concurrency in [1, 2, 5, 16] {
        let client = Arc::new(FakeClient::with_products(4));
        let config = WorkloadConfig::builder()
            .repeat_counts(5, 5, 5, 5)
            .workload_count(30)
            .max_concurrency(max_concurrency)
            .build();

        WorkloadEngine::new(config, Arc::clone(&client))
            .unwrap()
            .run()
            .await
            .unwrap();

        let peak = client.peak.load(Ordering::SeqCst);
        assert!(peak >= 1);
        assert!(peak <= max_concurrency, "{peak} > {max_concurrency}");
        assert_eq!(client.active.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn forced_read_on_empty_store() {
    let config = WorkloadConfig::builder()
        .repeat_counts(1, 0, 0, 0)
        .workload_count(1)
        .seed(seed_for(WorkloadType::Read))
        .build();

    let summary = run(config, FakeClient::default()).await.unwrap();

    assert_eq!(
        summary,
        Summary {
            list_count: 0,
            get_count: 0,
            create_count: 0,
            read_count: 1,
            write_count: 0,
            ddos_count: 0,
            mixed_count: 0,
            total_iterations: 1,
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn forced_write_creates_distinct_products() {
    let client = Arc::new(FakeClient::default());
    let config = WorkloadConfig::builder()
        .repeat_counts(0, 3, 0, 0)
        .workload_count(1)
        .seed(seed_for(WorkloadType::Write))
        .build();

    let summary = WorkloadEngine::new(config, Arc::clone(&client))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.create_count, 3);
    assert_eq!(summary.write_count, 3);
    assert_eq!(summary.total_iterations, 1);

    let products: Vec<_> = client.products.lock().unwrap().values().cloned().collect();
    assert_eq!(products.len(), 3);
    for product in products {
        assert_eq!(client.get(&product.id).await.unwrap(), product);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failing_create_fails_the_run_after_draining() {
    let client = Arc::new(FakeClient::default().fail_create_on(2));
    let config = WorkloadConfig::builder()
        .repeat_counts(0, 3, 0, 0)
        .workload_count(1)
        .max_concurrency(3)
        .seed(seed_for(WorkloadType::Write))
        .build();

    let result = WorkloadEngine::new(config, Arc::clone(&client))
        .unwrap()
        .run()
        .await;

    let Err(ClientError::Transport { context, .. }) = &result else {
        panic!("expected transport error, got {result:?}");
    };
    assert_eq!(context, "creating product");

    // Every call that was started has also finished by the time `run` returns.
    let started = client.started.load(Ordering::SeqCst);
    assert!(started >= 2);
    assert_eq!(client.finished.load(Ordering::SeqCst), started);
    assert_eq!(client.active.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn drain_policy_stops_later_iterations() {
    let client = Arc::new(FakeClient::default().fail_create_on(1));
    let config = WorkloadConfig::builder()
        .repeat_counts(0, 1, 0, 0)
        .workload_count(20)
        .max_concurrency(1)
        .seed(seed_for(WorkloadType::Write))
        .build();

    let result = WorkloadEngine::new(config, Arc::clone(&client))
        .unwrap()
        .run()
        .await;

    assert!(result.is_err());
    // Only the failing call and at most the one admitted before failure was observed ran.
    assert!(client.started.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn complete_all_policy_runs_every_iteration() {
    let client = Arc::new(FakeClient::default().fail_create_on(1));
    let config = WorkloadConfig::builder()
        .repeat_counts(0, 1, 0, 0)
        .workload_count(20)
        .max_concurrency(1)
        .seed(seed_for(WorkloadType::Write))
        .failure_policy(FailurePolicy::CompleteAll)
        .build();

    let expected_writes = WorkloadSelector::sequence(config.seed, config.workload_count)
        .into_iter()
        .filter(|w| *w == WorkloadType::Write)
        .count();

    let result = WorkloadEngine::new(config, Arc::clone(&client))
        .unwrap()
        .run()
        .await;

    assert!(matches!(result, Err(ClientError::Transport { .. })));
    assert_eq!(client.creates.load(Ordering::SeqCst), expected_writes);
}

#[tokio::test]
async fn zero_iterations_yield_empty_summary() {
    let config = WorkloadConfig::builder().workload_count(0).build();
    let summary = run(config, FakeClient::with_products(3)).await.unwrap();
    assert_eq!(summary, Summary::default());
}

#[test]
fn invalid_config_is_rejected() {
    let config = WorkloadConfig::builder().max_concurrency(0).build();
    let err = WorkloadEngine::new(config, FakeClient::default()).unwrap_err();
    assert_eq!(err, productload_engine::ConfigError::ZeroConcurrency);
}

#[test]
fn oversized_concurrency_is_rejected_at_construction() {
    let config = WorkloadConfig::builder().max_concurrency(usize::MAX).build();
    let err = WorkloadEngine::new(config, FakeClient::default()).unwrap_err();
    assert!(matches!(
        err,
        productload_engine::ConfigError::ConcurrencyTooLarge { .. }
    ));
}
