//! Bulk-loading the reference dataset into a store.

use std::time::Duration;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::store::Store;
use crate::timer::{bench, per_second};

/// Outcome of loading a dataset.
#[derive(Clone, Debug)]
pub struct LoadReport {
    /// Number of records inserted.
    pub records: u64,
    /// Number of insert batches.
    pub batches: u64,
    /// Wall-clock time of the whole load, including table creation.
    pub elapsed: Duration,
}

impl LoadReport {
    /// Inserted records per second.
    pub fn records_per_second(&self) -> f64 {
        per_second(self.records as f64, self.elapsed)
    }
}

/// Creates the table and inserts the dataset in ascending batches of `batch_size` records.
///
/// The first failing batch aborts the load.
pub fn load(store: &mut dyn Store, dataset: &Dataset, batch_size: usize) -> Result<LoadReport> {
    let batches = dataset.batches(batch_size)?;
    let total = dataset.len();

    let (result, elapsed) = bench(|| -> Result<LoadReport> {
        store.create_table(&dataset.shape())?;

        let mut report = LoadReport {
            records: 0,
            batches: 0,
            elapsed: Duration::ZERO,
        };
        for batch in batches {
            store.insert_batch(&batch)?;

            report.records += batch.len() as u64;
            report.batches += 1;
            tracing::debug!(
                store = store.name(),
                loaded = report.records,
                total,
                "inserted batch {:?}",
                batch.keys()
            );
        }

        Ok(report)
    });

    let report = LoadReport {
        elapsed,
        ..result?
    };
    tracing::info!(
        store = store.name(),
        records = report.records,
        batches = report.batches,
        elapsed = ?report.elapsed,
        "loaded dataset"
    );

    Ok(report)
}
