//! Full-table sequential scan measuring data transfer.

use std::hint::black_box;
use std::time::Duration;

use crate::dataset::DatasetShape;
use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::timer::{bench, per_second};

const MIB: f64 = 1024.0 * 1024.0;

/// Outcome of a full scan.
#[derive(Clone, Debug)]
pub struct ScanReport {
    /// Number of records read.
    pub records: u64,
    /// Number of fields read.
    pub fields: u64,
    /// Number of bytes copied out of the store.
    pub bytes: u64,
    /// Wall-clock time of the scan.
    pub elapsed: Duration,
}

impl ScanReport {
    /// Transferred data in MiB.
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / MIB
    }

    /// Transferred MiB per second.
    pub fn megabytes_per_second(&self) -> f64 {
        per_second(self.megabytes(), self.elapsed)
    }
}

/// Reads every field of every record once, copying each value into a holding buffer.
///
/// The holding buffer passes through [`black_box`] after every record so the copies cannot be
/// optimized away. Values are not compared with the reference dataset, but every field must have
/// the configured length and the scan must produce exactly `shape.record_count` records.
pub fn run_scan(store: &mut dyn Store, shape: &DatasetShape) -> Result<ScanReport> {
    let field_length = shape.field_length;
    let mut holding = vec![0u8; shape.record_size()];
    let mut records = 0u64;

    tracing::info!(
        store = store.name(),
        megabytes = shape.total_bytes() as f64 / MIB,
        "benchmarking full scan"
    );

    let (result, elapsed) = bench(|| {
        store.scan(&mut |row| {
            for (index, slot) in holding.chunks_exact_mut(field_length).enumerate() {
                let value = row.field(index)?;
                if value.len() != field_length {
                    return Err(StoreError::malformed(format!(
                        "field {index} has {} bytes, expected {field_length}",
                        value.len()
                    )));
                }
                slot.copy_from_slice(value);
            }
            black_box(&mut holding);
            records += 1;
            Ok(())
        })
    });
    result?;

    if records != shape.record_count {
        return Err(StoreError::RowCount {
            expected: shape.record_count,
            actual: records,
        }
        .into());
    }

    let fields = records * shape.field_count as u64;
    let report = ScanReport {
        records,
        fields,
        bytes: fields * field_length as u64,
        elapsed,
    };
    tracing::info!(
        elapsed = ?report.elapsed,
        megabytes_per_second = report.megabytes_per_second(),
        "finished full scan"
    );

    Ok(report)
}
