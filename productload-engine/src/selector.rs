//! Seeded selection of workload types.
//!
//! The selection sequence is a pure function of the seed, so two runs with the same seed issue
//! the same workloads in the same order. The algorithm is part of the contract:
//!
//! 1. Seed a [`Xoshiro256PlusPlus`] generator with `seed_from_u64(seed)`, which expands the
//!    64-bit seed into the 256-bit state using SplitMix64.
//! 2. For every draw, take `next_u32()` and keep its top two bits (`value >> 30`).
//! 3. Map the resulting index `0..4` to [`WorkloadType::ALL`] in declaration order.
//!
//! Since the number of workload types is a power of two, every type has probability exactly
//! 1/4 per draw, and draws are independent. No balancing happens across the sequence.

use std::fmt;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// One of the four traffic shapes issued against the product service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadType {
    /// List all products, then fetch each of them.
    Read,
    /// Create one new product.
    Write,
    /// List all products ten times in a row.
    Ddos,
    /// List, create a product, then fetch it back.
    Mixed,
}

impl WorkloadType {
    /// All workload types, in selection index order.
    pub const ALL: [WorkloadType; 4] = [Self::Read, Self::Write, Self::Ddos, Self::Mixed];

    /// Returns the lowercase name used in logs and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Ddos => "ddos",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An infinite, reproducible stream of [`WorkloadType`]s.
#[derive(Clone, Debug)]
pub struct WorkloadSelector {
    rng: Xoshiro256PlusPlus,
}

impl WorkloadSelector {
    /// Creates a selector for the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Returns the first `count` workload types drawn for `seed`.
    pub fn sequence(seed: u64, count: usize) -> Vec<WorkloadType> {
        Self::new(seed).take(count).collect()
    }

    /// Draws the next workload type.
    pub fn next_workload(&mut self) -> WorkloadType {
        let index = self.rng.next_u32() >> 30;
        WorkloadType::ALL[index as usize]
    }
}

impl Iterator for WorkloadSelector {
    type Item = WorkloadType;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_workload())
    }
}
