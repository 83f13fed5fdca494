//! Runs the benchmark against a product service and reports the results.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use productload_client::ClientBuilder;
use productload_engine::{Summary, WorkloadEngine, WorkloadType};
use productload_server::{ProductStore, ServerHandle};
use tokio::signal::unix::SignalKind;
use yansi::Paint;

use crate::config::Config;

/// The outcome of one successful repetition.
#[derive(Clone, Debug)]
pub struct Report {
    /// 1-based number of the repetition.
    pub repetition: usize,
    /// Final counters of the run.
    pub summary: Summary,
    /// Wall time from submitting the first invocation until all of them were joined.
    pub elapsed: Duration,
}

/// Runs the configured number of repetitions and prints a summary after each.
///
/// Stops at the first repetition that fails or does not pass validation.
pub async fn run(config: &Config) -> Result<Vec<Report>> {
    let mut reports = Vec::with_capacity(config.repetitions);

    for repetition in 1..=config.repetitions {
        let report = run_once(config, repetition)
            .await
            .with_context(|| format!("repetition {repetition} failed"))?;
        print_report(&report, config.workload.workload_count);
        reports.push(report);
    }

    Ok(reports)
}

/// Runs a single repetition against a fresh server, if one is embedded.
async fn run_once(config: &Config, repetition: usize) -> Result<Report> {
    let mut workload = config.workload.clone();

    let server = if config.server.embedded {
        let store = ProductStore::with_initial(config.server.initial_product_count);
        let server = ServerHandle::start(&config.server.host, config.server.port, store).await?;
        workload.host = config.server.host.clone();
        workload.port = server.port();
        Some(server)
    } else {
        None
    };

    tracing::info!(
        repetition,
        host = %workload.host,
        port = workload.port,
        seed = workload.seed,
        "starting workload"
    );

    let expected = workload.workload_count as u64;
    let outcome = async {
        let client = ClientBuilder::new(workload.host.as_str(), workload.port)
            .timeout(config.client.timeout)
            .build()?;
        let engine =
            WorkloadEngine::new(workload, client).context("invalid workload configuration")?;

        let start = Instant::now();
        let summary = engine.run().await.context("workload failed")?;
        anyhow::Ok((summary, start.elapsed()))
    }
    .await;

    // Stop the server even if the workload could not be set up or failed.
    if let Some(server) = server {
        server.shutdown().await?;
    }

    let (summary, elapsed) = outcome?;
    summary.validate(expected)?;

    Ok(Report {
        repetition,
        summary,
        elapsed,
    })
}

fn print_report(report: &Report, expected: usize) {
    let summary = &report.summary;

    println!();
    println!(
        "{} {} ({} iterations in {:.2?})",
        "## Repetition".bold(),
        report.repetition.bold().blue(),
        summary.total_iterations.bold(),
        report.elapsed,
    );

    println!("{}", "### Operations".bold());
    println!("  list:   {}", summary.list_count.blue());
    println!("  get:    {}", summary.get_count.blue());
    println!("  create: {}", summary.create_count.blue());

    println!("{}", "### Workloads".bold());
    for workload in WorkloadType::ALL {
        println!(
            "  {:<7} {}",
            format!("{workload}:"),
            summary.workload_count(workload).blue()
        );
    }

    println!(
        "{} workload count {} == {}",
        "ok".green().bold(),
        summary.total_iterations,
        expected
    );
}

/// Serves the product service until the process is asked to terminate.
pub async fn serve(config: &Config) -> Result<()> {
    let store = ProductStore::with_initial(config.server.initial_product_count);
    let server = ServerHandle::start(&config.server.host, config.server.port, store).await?;

    elegant_departure::tokio::depart()
        .on_termination()
        .on_sigint()
        .on_signal(SignalKind::hangup())
        .await;

    tracing::info!("Shutting down ...");
    server.shutdown().await
}
