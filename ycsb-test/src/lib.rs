//! Test utilities for the YCSB benchmark harness.
//!
//! This crate provides helpers shared by the unit and integration tests of `ycsb-bench`. See the
//! modules for all available utilities.

pub mod stats;
pub mod tracing;
