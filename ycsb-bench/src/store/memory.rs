//! In-memory store.
//!
//! This provides a [`Store`] backed by a `BTreeMap`, used in tests and to measure the overhead
//! of the harness without a real database behind it.

use std::collections::BTreeMap;

use super::{ScanRow, Store};
use crate::dataset::{Batch, DatasetShape};
use crate::error::{StoreError, StoreResult};

/// A [`Store`] keeping every record as one contiguous buffer in an ordered map.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    shape: Option<DatasetShape>,
    rows: BTreeMap<u64, Box<[u8]>>,
}

impl InMemoryStore {
    /// Creates an empty store without a table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn shape(&self) -> StoreResult<DatasetShape> {
        self.shape.ok_or(StoreError::SchemaMissing)
    }
}

impl Store for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn create_table(&mut self, shape: &DatasetShape) -> StoreResult<()> {
        self.shape = Some(*shape);
        self.rows.clear();
        Ok(())
    }

    fn insert_batch(&mut self, batch: &Batch<'_>) -> StoreResult<()> {
        let shape = self.shape()?;
        if batch.shape().field_count != shape.field_count
            || batch.shape().field_length != shape.field_length
        {
            return Err(StoreError::malformed("batch does not match the table layout"));
        }

        // check first so that a failed batch leaves no partial rows behind
        if let Some(record) = batch.records().find(|r| self.rows.contains_key(&r.key())) {
            return Err(StoreError::DuplicateKey { key: record.key() });
        }

        for record in batch.records() {
            let row = record.fields().flatten().copied().collect();
            self.rows.insert(record.key(), row);
        }

        Ok(())
    }

    fn read_field(&mut self, key: u64, field: usize, out: &mut Vec<u8>) -> StoreResult<bool> {
        out.clear();

        let shape = self.shape()?;
        if field >= shape.field_count {
            return Err(StoreError::malformed(format!("no column for field {field}")));
        }

        let Some(row) = self.rows.get(&key) else {
            return Ok(false);
        };

        let start = field * shape.field_length;
        out.extend_from_slice(&row[start..start + shape.field_length]);
        Ok(true)
    }

    fn scan(&mut self, visit: &mut dyn FnMut(&dyn ScanRow) -> StoreResult<()>) -> StoreResult<()> {
        let shape = self.shape()?;
        for (&key, data) in &self.rows {
            visit(&MemoryRow {
                key,
                field_length: shape.field_length,
                data: &data[..],
            })?;
        }
        Ok(())
    }
}

struct MemoryRow<'a> {
    key: u64,
    field_length: usize,
    data: &'a [u8],
}

impl ScanRow for MemoryRow<'_> {
    fn key(&self) -> StoreResult<u64> {
        Ok(self.key)
    }

    fn field(&self, index: usize) -> StoreResult<&[u8]> {
        let start = index * self.field_length;
        self.data
            .get(start..start + self.field_length)
            .ok_or_else(|| StoreError::malformed(format!("no column for field {index}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::random::Random32;

    #[test]
    fn failed_batch_is_atomic() {
        let shape = DatasetShape {
            record_count: 20,
            field_count: 2,
            field_length: 8,
        };
        let dataset = Dataset::generate(shape, &mut Random32::default()).unwrap();
        let mut batches = dataset.batches(10).unwrap();
        let first = batches.next().unwrap();
        let second = batches.next().unwrap();

        let mut store = InMemoryStore::new();
        store.create_table(&shape).unwrap();
        store.insert_batch(&first).unwrap();
        assert_eq!(store.len(), 10);

        // a batch overlapping existing keys is rejected as a whole
        let overlapping = dataset.batches(15).unwrap().next().unwrap();
        assert!(matches!(
            store.insert_batch(&overlapping),
            Err(StoreError::DuplicateKey { key: 0 })
        ));
        assert_eq!(store.len(), 10);

        store.insert_batch(&second).unwrap();
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn rejects_mismatched_layout() {
        let shape = DatasetShape {
            record_count: 5,
            field_count: 2,
            field_length: 8,
        };
        let dataset = Dataset::generate(shape, &mut Random32::default()).unwrap();

        let mut store = InMemoryStore::new();
        store
            .create_table(&DatasetShape {
                field_count: 3,
                ..shape
            })
            .unwrap();

        let batch = dataset.batches(5).unwrap().next().unwrap();
        assert!(matches!(
            store.insert_batch(&batch),
            Err(StoreError::Malformed { .. })
        ));
        assert!(store.is_empty());
    }
}
