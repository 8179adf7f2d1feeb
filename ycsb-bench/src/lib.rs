//! A YCSB-style benchmark harness for storage engines.
//!
//! A run generates a deterministic reference [`Dataset`](dataset::Dataset), bulk-loads it into a
//! [`Store`](store::Store), and then measures two workloads:
//!
//! - *point lookups* of single fields, with keys drawn from a [`ZipfSampler`](zipf::ZipfSampler)
//!   so that a few hot keys receive most of the requests. Every value read from the store is
//!   compared byte for byte with the reference dataset, and the first mismatch aborts the run.
//! - a *full scan* copying every field of every record, reported as data throughput.
//!
//! All randomness comes from seeded [`Random32`](random::Random32) generators, so a run with the
//! same configuration reads exactly the same data in exactly the same order.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cli;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod load;
pub mod observability;
pub mod random;
pub mod report;
pub mod run;
pub mod store;
pub mod timer;
pub mod zipf;

pub use crate::error::{BenchError, Result};
pub use crate::run::run;
