//! The four workload recipes, expressed in terms of [`ResourceClient`] calls.
//!
//! Each recipe runs to completion before returning and records its calls in the shared
//! [`Counters`]. A failing client call aborts the recipe and is returned unchanged.

use crate::counters::Counters;
use crate::error::ClientResult;
use crate::resource::{Resource, ResourceClient};
use crate::selector::WorkloadType;

/// Number of back-to-back list calls issued by a ddos invocation.
pub const DDOS_LIST_REPEAT: u64 = 10;

/// Runs one invocation of the given workload type.
pub async fn run_workload<C: ResourceClient + ?Sized>(
    workload: WorkloadType,
    client: &C,
    counters: &Counters,
) -> ClientResult<()> {
    match workload {
        WorkloadType::Read => read(client, counters).await,
        WorkloadType::Write => write(client, counters).await,
        WorkloadType::Ddos => ddos(client, counters).await,
        WorkloadType::Mixed => mixed(client, counters).await,
    }
}

/// Lists all products and fetches each of them by id.
pub async fn read<C: ResourceClient + ?Sized>(client: &C, counters: &Counters) -> ClientResult<()> {
    let products = client.list().await?;
    tracing::trace!(products = products.len(), "read workload");

    for product in &products {
        client.get(&product.id).await?;
        counters.add_get();
    }

    counters.add_workload(WorkloadType::Read);
    Ok(())
}

/// Creates one new product.
pub async fn write<C: ResourceClient + ?Sized>(client: &C, counters: &Counters) -> ClientResult<()> {
    let product = Resource::generate();
    tracing::trace!(id = %product.id, "write workload");

    client.create(&product).await?;

    counters.add_create();
    counters.add_workload(WorkloadType::Write);
    Ok(())
}

/// Lists all products [`DDOS_LIST_REPEAT`] times in a row, discarding the results.
pub async fn ddos<C: ResourceClient + ?Sized>(client: &C, counters: &Counters) -> ClientResult<()> {
    for _ in 0..DDOS_LIST_REPEAT {
        client.list().await?;
    }

    counters.add_lists(DDOS_LIST_REPEAT);
    counters.add_workload(WorkloadType::Ddos);
    Ok(())
}

/// Lists all products, creates a new one and reads it back.
pub async fn mixed<C: ResourceClient + ?Sized>(client: &C, counters: &Counters) -> ClientResult<()> {
    client.list().await?;
    let product = Resource::generate();
    client.create(&product).await?;
    client.get(&product.id).await?;

    counters.add_lists(1);
    counters.add_create();
    counters.add_get();
    counters.add_workload(WorkloadType::Mixed);
    Ok(())
}
