//! The reference dataset, which is both the bulk-load payload and the correctness oracle.
//!
//! A [`Dataset`] maps the dense keys `0..record_count` to records of `field_count` fields, each
//! exactly `field_length` bytes long. Generation is a pure function of the generator's seed:
//!
//! - keys are visited in ascending order, fields in ascending order within a key, bytes in
//!   ascending offset within a field;
//! - every draw from the generator yields four bytes, one per octet of the 32-bit word starting
//!   with the least significant one. Draws do not span fields, so the unused octets of a
//!   field's last draw are discarded when the field length is not a multiple of four;
//! - each octet selects one of 64 printable symbols by its low six bits.
//!
//! Regenerating with the same seed therefore reproduces what was loaded into the store.

use std::fmt;
use std::ops::Range;

use crate::error::{ConfigError, DatasetError};
use crate::random::Random32;

/// Printable symbols used for field contents. Contains no quoting characters.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Dimensions of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatasetShape {
    /// Number of records, keyed `0..record_count`.
    pub record_count: u64,
    /// Number of fields per record.
    pub field_count: usize,
    /// Length of every field in bytes.
    pub field_length: usize,
}

impl DatasetShape {
    /// Size of one record in bytes.
    pub fn record_size(&self) -> usize {
        self.field_count * self.field_length
    }

    /// Size of all records in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.record_count * self.record_size() as u64
    }

    /// Checks that the shape describes at least one byte and fits into memory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_count == 0 {
            return Err(ConfigError::EmptyDomain);
        }
        if self.field_count == 0 {
            return Err(ConfigError::ZeroFieldCount);
        }
        if self.field_length == 0 {
            return Err(ConfigError::ZeroFieldLength);
        }

        let Some(record_size) = self.field_count.checked_mul(self.field_length) else {
            return Err(ConfigError::RecordTooLarge {
                field_count: self.field_count,
                field_length: self.field_length,
            });
        };

        let addressable = usize::try_from(self.record_count)
            .ok()
            .and_then(|records| records.checked_mul(record_size))
            .is_some();
        if !addressable {
            return Err(ConfigError::DomainTooLarge(self.record_count));
        }

        Ok(())
    }
}

/// The in-memory reference dataset.
///
/// All records live in one contiguous buffer in key order. The dataset is immutable once
/// generated.
pub struct Dataset {
    shape: DatasetShape,
    data: Box<[u8]>,
}

impl Dataset {
    /// Generates a dataset of the given shape, consuming `rng` in the documented order.
    pub fn generate(shape: DatasetShape, rng: &mut Random32) -> Result<Self, ConfigError> {
        shape.validate()?;

        let len = shape.total_bytes() as usize;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ConfigError::DomainTooLarge(shape.record_count))?;
        data.resize(len, 0u8);
        let mut data = data.into_boxed_slice();
        for field in data.chunks_exact_mut(shape.field_length) {
            fill_printable(field, rng);
        }

        Ok(Self { shape, data })
    }

    /// Dimensions of this dataset.
    pub fn shape(&self) -> DatasetShape {
        self.shape
    }

    /// Number of records.
    pub fn len(&self) -> u64 {
        self.shape.record_count
    }

    /// Always `false`, generation rejects empty datasets.
    pub fn is_empty(&self) -> bool {
        self.shape.record_count == 0
    }

    /// Returns the value of one field of one record.
    pub fn lookup(&self, key: u64, field: usize) -> Result<&[u8], DatasetError> {
        self.record(key)?.field(field)
    }

    /// Returns a view of the record with the given key.
    pub fn record(&self, key: u64) -> Result<Record<'_>, DatasetError> {
        if key >= self.shape.record_count {
            return Err(DatasetError::KeyOutOfRange {
                key,
                count: self.shape.record_count,
            });
        }

        Ok(self.record_unchecked(key))
    }

    fn record_unchecked(&self, key: u64) -> Record<'_> {
        let size = self.shape.record_size();
        let start = key as usize * size;
        Record {
            key,
            field_length: self.shape.field_length,
            data: &self.data[start..start + size],
        }
    }

    /// Iterates over all records in ascending key order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = Record<'_>> + '_ {
        (0..self.shape.record_count as usize).map(|key| self.record_unchecked(key as u64))
    }

    /// Splits the dataset into consecutive batches of at most `batch_size` records.
    ///
    /// Batches are yielded in ascending key order and together cover every key exactly once.
    pub fn batches(
        &self,
        batch_size: usize,
    ) -> Result<impl Iterator<Item = Batch<'_>> + '_, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        let count = self.shape.record_count;
        let batches = (0..count)
            .step_by(batch_size)
            .map(move |start| Batch {
                dataset: self,
                keys: start..(start + batch_size as u64).min(count),
            });

        Ok(batches)
    }

    /// Flips one byte of a stored field, for tests exercising verification failures.
    #[cfg(test)]
    pub(crate) fn corrupt(&mut self, key: u64, field: usize, offset: usize) {
        let size = self.shape.record_size();
        let index = key as usize * size + field * self.shape.field_length + offset;
        self.data[index] ^= 0x20;
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

fn fill_printable(buf: &mut [u8], rng: &mut Random32) {
    for chunk in buf.chunks_mut(4) {
        let word = rng.next().to_le_bytes();
        for (byte, octet) in chunk.iter_mut().zip(word) {
            *byte = ALPHABET[(octet & 0x3f) as usize];
        }
    }
}

/// A borrowed view of one record.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    key: u64,
    field_length: usize,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    /// The record's key.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.data.len() / self.field_length
    }

    /// Returns the field with the given index.
    pub fn field(&self, field: usize) -> Result<&'a [u8], DatasetError> {
        let count = self.field_count();
        if field >= count {
            return Err(DatasetError::FieldOutOfRange { field, count });
        }

        let start = field * self.field_length;
        Ok(&self.data[start..start + self.field_length])
    }

    /// Iterates over all fields in order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &'a [u8]> + 'a {
        self.data.chunks_exact(self.field_length)
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("key", &self.key)
            .field("fields", &self.field_count())
            .finish()
    }
}

/// A run of consecutive records handed to a store in a single insert.
#[derive(Clone, Debug)]
pub struct Batch<'a> {
    dataset: &'a Dataset,
    keys: Range<u64>,
}

impl<'a> Batch<'a> {
    /// The keys covered by this batch.
    pub fn keys(&self) -> Range<u64> {
        self.keys.clone()
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        (self.keys.end - self.keys.start) as usize
    }

    /// Always `false`, batches contain at least one record.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Dimensions of the records in this batch.
    pub fn shape(&self) -> DatasetShape {
        self.dataset.shape
    }

    /// Iterates over the records in ascending key order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = Record<'a>> + 'a {
        let dataset = self.dataset;
        let keys = self.keys.start as usize..self.keys.end as usize;
        keys.map(move |key| dataset.record_unchecked(key as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(record_count: u64) -> DatasetShape {
        DatasetShape {
            record_count,
            field_count: 10,
            field_length: 100,
        }
    }

    #[test]
    fn regeneration_is_identical() {
        let a = Dataset::generate(shape(1000), &mut Random32::default()).unwrap();
        let b = Dataset::generate(shape(1000), &mut Random32::default()).unwrap();

        for (left, right) in a.records().zip(b.records()) {
            assert_eq!(left, right);
        }
        assert_eq!(a.data, b.data);

        let c = Dataset::generate(shape(1000), &mut Random32::new(1)).unwrap();
        assert_ne!(a.data, c.data);
    }

    #[test]
    fn lookup_returns_generated_bytes() {
        let mut rng = Random32::new(99);
        let dataset = Dataset::generate(shape(50), &mut rng).unwrap();

        // replay the documented traversal order
        let mut replay = Random32::new(99);
        for key in 0..50 {
            for field in 0..10 {
                let mut expected = vec![0u8; 100];
                fill_printable(&mut expected, &mut replay);
                assert_eq!(dataset.lookup(key, field).unwrap(), expected.as_slice());
            }
        }

        // generation consumed exactly 25 draws per field
        assert_eq!(rng, replay);
    }

    #[test]
    fn fields_are_printable() {
        let dataset = Dataset::generate(shape(100), &mut Random32::default()).unwrap();
        for record in dataset.records() {
            assert_eq!(record.fields().len(), 10);
            for field in record.fields() {
                assert_eq!(field.len(), 100);
                assert!(field.iter().all(|b| b.is_ascii_alphanumeric() || b"-_".contains(b)));
            }
        }
    }

    #[test]
    fn out_of_range_is_an_error() {
        let dataset = Dataset::generate(shape(10), &mut Random32::default()).unwrap();

        assert_eq!(
            dataset.lookup(10, 0),
            Err(DatasetError::KeyOutOfRange { key: 10, count: 10 })
        );
        assert_eq!(
            dataset.lookup(9, 10),
            Err(DatasetError::FieldOutOfRange {
                field: 10,
                count: 10
            })
        );
        assert!(dataset.lookup(9, 9).is_ok());
    }

    #[test]
    fn rejects_degenerate_shapes() {
        let mut rng = Random32::default();
        let empty = DatasetShape {
            record_count: 0,
            ..shape(1)
        };
        assert_eq!(
            Dataset::generate(empty, &mut rng).unwrap_err(),
            ConfigError::EmptyDomain
        );

        let no_fields = DatasetShape {
            field_count: 0,
            ..shape(1)
        };
        assert_eq!(no_fields.validate(), Err(ConfigError::ZeroFieldCount));

        let no_bytes = DatasetShape {
            field_length: 0,
            ..shape(1)
        };
        assert_eq!(no_bytes.validate(), Err(ConfigError::ZeroFieldLength));

        let huge = shape(u64::MAX);
        assert_eq!(huge.validate(), Err(ConfigError::DomainTooLarge(u64::MAX)));

        let wide = DatasetShape {
            record_count: 1,
            field_count: usize::MAX / 2 + 1,
            field_length: 2,
        };
        assert_eq!(
            wide.validate(),
            Err(ConfigError::RecordTooLarge {
                field_count: usize::MAX / 2 + 1,
                field_length: 2
            })
        );
        assert_eq!(
            Dataset::generate(wide, &mut rng).unwrap_err(),
            wide.validate().unwrap_err()
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn unallocatable_dataset_is_an_error() {
        // addressable as a byte count, but larger than any allocation may be
        let shape = DatasetShape {
            record_count: 1 << 62,
            field_count: 1,
            field_length: 3,
        };
        assert_eq!(shape.validate(), Ok(()));
        assert_eq!(
            Dataset::generate(shape, &mut Random32::default()).unwrap_err(),
            ConfigError::DomainTooLarge(1 << 62)
        );
    }

    #[test]
    fn batches_cover_all_keys_in_order() {
        let dataset = Dataset::generate(shape(2500), &mut Random32::default()).unwrap();

        let batches: Vec<_> = dataset.batches(1000).unwrap().collect();
        let ranges: Vec<_> = batches.iter().map(Batch::keys).collect();
        assert_eq!(ranges, [0..1000, 1000..2000, 2000..2500]);
        assert_eq!(batches[2].len(), 500);

        let keys: Vec<_> = batches
            .iter()
            .flat_map(|batch| batch.records())
            .map(|record| record.key())
            .collect();
        assert_eq!(keys, (0..2500).collect::<Vec<_>>());

        assert!(matches!(
            dataset.batches(0),
            Err(ConfigError::ZeroBatchSize)
        ));
    }
}
