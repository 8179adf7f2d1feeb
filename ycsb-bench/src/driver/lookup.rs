//! Skewed point lookups, verified against the reference dataset.

use std::fmt;
use std::time::{Duration, Instant};

use sketches_ddsketch::DDSketch;

use crate::dataset::Dataset;
use crate::error::{Result, StoreError, StoreResult, VerificationError};
use crate::random::Random32;
use crate::store::Store;
use crate::timer::{bench, per_second};

/// Knobs of the point-lookup driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct LookupOptions {
    /// Record the latency of every lookup in a sketch.
    ///
    /// This adds two clock reads per lookup to the measured loop.
    pub record_latencies: bool,
}

/// Outcome of a point-lookup run.
pub struct LookupReport {
    /// Number of verified lookups.
    pub lookups: u64,
    /// Wall-clock time of the lookup loop.
    pub elapsed: Duration,
    /// Per-lookup latencies in seconds, if requested.
    pub latencies: Option<DDSketch>,
}

impl LookupReport {
    /// Verified lookups per second.
    pub fn ops_per_second(&self) -> f64 {
        per_second(self.lookups as f64, self.elapsed)
    }
}

impl fmt::Debug for LookupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupReport")
            .field("lookups", &self.lookups)
            .field("elapsed", &self.elapsed)
            .field(
                "latencies",
                &self.latencies.as_ref().map(|sketch| sketch.count()),
            )
            .finish()
    }
}

/// Reads one field for every key in `keys` from `store` and compares it with `oracle`.
///
/// The field of each lookup is `fields.next() % field_count`. A missing row, a store error, or a
/// value differing from the oracle by a single byte aborts the run with an error.
pub fn run_lookups(
    store: &mut dyn Store,
    oracle: &Dataset,
    keys: &[u64],
    fields: &mut Random32,
    options: LookupOptions,
) -> Result<LookupReport> {
    let mut latencies = options.record_latencies.then(DDSketch::default);

    tracing::info!(
        store = store.name(),
        lookups = keys.len(),
        "benchmarking point lookups"
    );

    let (result, elapsed) = match latencies.as_mut() {
        None => bench(|| {
            verify_lookups(oracle, keys, fields, |key, field, value| {
                store.read_field(key, field, value)
            })
        }),
        Some(sketch) => bench(|| {
            verify_lookups(oracle, keys, fields, |key, field, value| {
                let start = Instant::now();
                let found = store.read_field(key, field, value);
                sketch.add(start.elapsed().as_secs_f64());
                found
            })
        }),
    };
    result?;

    let report = LookupReport {
        lookups: keys.len() as u64,
        elapsed,
        latencies,
    };
    tracing::info!(
        elapsed = ?report.elapsed,
        ops_per_second = report.ops_per_second(),
        "finished point lookups"
    );

    Ok(report)
}

/// The measured loop. `read` performs the store access together with any per-lookup
/// instrumentation, so the loop itself carries none.
fn verify_lookups(
    oracle: &Dataset,
    keys: &[u64],
    fields: &mut Random32,
    mut read: impl FnMut(u64, usize, &mut Vec<u8>) -> StoreResult<bool>,
) -> Result<()> {
    let field_count = oracle.shape().field_count;
    let mut value = Vec::with_capacity(oracle.shape().field_length);

    for (index, &key) in keys.iter().enumerate() {
        let field = fields.next() as usize % field_count;

        if !read(key, field, &mut value)? {
            return Err(StoreError::NotFound { key }.into());
        }

        let expected = oracle.lookup(key, field)?;
        if value != expected {
            return Err(VerificationError {
                index,
                key,
                field,
                expected: expected.to_vec(),
                actual: std::mem::take(&mut value),
            }
            .into());
        }
    }

    Ok(())
}
