//! The benchmark binary.
//!
//! Generates a reference dataset, loads it into the configured store, then measures skewed point
//! lookups and a full sequential scan. Run `ycsb --help` for usage.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

fn main() -> anyhow::Result<()> {
    ycsb_bench::cli::execute()
}
