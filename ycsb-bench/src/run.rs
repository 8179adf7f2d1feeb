//! Sequencing of a complete benchmark run.

use std::time::Duration;

use crate::config::Config;
use crate::dataset::{Dataset, DatasetShape};
use crate::driver::{LookupOptions, LookupReport, ScanReport, run_lookups, run_scan};
use crate::error::Result;
use crate::load::{LoadReport, load};
use crate::random::Random32;
use crate::store::Store;
use crate::timer::bench;
use crate::zipf::ZipfSampler;

/// Results of all phases of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Dimensions of the generated dataset.
    pub shape: DatasetShape,
    /// Zipfian skew of the lookup keys.
    pub theta: f64,
    /// Time spent generating the reference dataset.
    pub generate: Duration,
    /// Bulk load of the dataset.
    pub load: LoadReport,
    /// Point lookups.
    pub lookup: LookupReport,
    /// Full scan.
    pub scan: ScanReport,
}

/// Runs all phases against `store`: generate, load, point lookups, full scan.
///
/// The configuration is validated before anything else happens. The first error of any phase
/// aborts the run, later phases do not execute.
pub fn run(store: &mut dyn Store, config: &Config) -> Result<RunReport> {
    config.validate()?;
    let shape = config.shape();
    // rejects the parameters before generating a potentially large dataset
    let sampler = ZipfSampler::new(shape.record_count, config.theta)?;

    tracing::info!(?shape, seed = config.seed, "generating reference dataset");
    let (dataset, generate) = bench(|| Dataset::generate(shape, &mut Random32::new(config.seed)));
    let dataset = dataset?;
    tracing::info!(elapsed = ?generate, "generated reference dataset");

    tracing::info!(store = store.name(), "loading dataset");
    let load = load(store, &dataset, config.batch_size)?;

    let keys = sampler.generate_lookup_keys(&mut Random32::new(config.seed), config.transactions);
    let options = LookupOptions {
        record_latencies: config.latencies,
    };
    let lookup = run_lookups(
        store,
        &dataset,
        &keys,
        &mut Random32::new(config.seed),
        options,
    )?;

    let scan = run_scan(store, &shape)?;

    Ok(RunReport {
        shape,
        theta: config.theta,
        generate,
        load,
        lookup,
        scan,
    })
}
