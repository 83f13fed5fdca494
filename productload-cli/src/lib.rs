//! The `productload` command line tool.
//!
//! `productload run` starts an in-process product server, drives the workload engine against it
//! over HTTP, validates the resulting counters and prints them. `productload serve` runs the
//! product server on its own, so that a workload can target it from elsewhere.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cli;
pub mod config;
pub mod harness;
pub mod observability;
