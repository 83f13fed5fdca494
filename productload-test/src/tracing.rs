use tracing_subscriber::EnvFilter;

const CRATE_NAMES: &[&str] = &[
    "productload",
    "productload_engine",
    "productload_client",
    "productload_server",
];

/// Initialize the logger for testing.
///
/// This logs to the stdout registered by the Rust test runner. Unless `RUST_LOG` is set, only
/// the workspace crates log at full verbosity and everything else is limited to warnings.
///
/// # Example
///
/// ```
/// productload_test::tracing::init();
/// ```
pub fn init() {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => EnvFilter::new(value),
        Err(_) => CRATE_NAMES.iter().fold(EnvFilter::new("WARN"), |filter, name| {
            filter.add_directive(format!("{name}=TRACE").parse().unwrap())
        }),
    };

    tracing_subscriber::fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_test_writer()
        .compact()
        .try_init()
        .ok();
}
