//! Error types of the benchmark harness.
//!
//! Errors fall into four classes, each of which aborts the current run:
//!
//! - [`ConfigError`]: invalid parameters, detected before any work begins.
//! - [`DatasetError`]: out-of-range accesses to the reference dataset.
//! - [`StoreError`]: any unexpected outcome reported by the backing store.
//! - [`VerificationError`]: a value read from the store differs from the reference dataset.

use thiserror::Error;

/// Invalid benchmark parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The Zipfian skew must be a finite, non-negative number.
    #[error("invalid zipfian skew {0}, expected a finite value >= 0")]
    InvalidTheta(f64),

    /// A key domain needs at least one key.
    #[error("key domain must not be empty")]
    EmptyDomain,

    /// The key domain does not fit into memory on this platform.
    #[error("key domain of {0} keys exceeds the addressable size")]
    DomainTooLarge(u64),

    /// A single record does not fit into memory on this platform.
    #[error("records of {field_count} fields of {field_length} bytes exceed the addressable size")]
    RecordTooLarge {
        /// Number of fields per record.
        field_count: usize,
        /// Length of every field in bytes.
        field_length: usize,
    },

    /// Xorshift generators never leave the all-zero state.
    #[error("random seed must not be zero")]
    ZeroSeed,

    /// Records need at least one field.
    #[error("field count must not be zero")]
    ZeroFieldCount,

    /// Fields need at least one byte.
    #[error("field length must not be zero")]
    ZeroFieldLength,

    /// Bulk loading needs at least one record per batch.
    #[error("batch size must not be zero")]
    ZeroBatchSize,
}

/// Out-of-range access to the reference dataset.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    /// The key is not part of the dataset.
    #[error("key {key} out of range, dataset has {count} records")]
    KeyOutOfRange {
        /// The requested key.
        key: u64,
        /// Number of records in the dataset.
        count: u64,
    },

    /// The field index exceeds the number of fields per record.
    #[error("field {field} out of range, records have {count} fields")]
    FieldOutOfRange {
        /// The requested field index.
        field: usize,
        /// Number of fields per record.
        count: usize,
    },
}

/// Errors reported by, or about, the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error returned by SQLite.
    #[error("sqlite error: {context}")]
    Sqlite {
        /// The operation that failed.
        context: String,
        /// The underlying SQLite error.
        #[source]
        cause: rusqlite::Error,
    },

    /// A point query found no row for the key.
    #[error("expected a row for key {key}, found none")]
    NotFound {
        /// The queried key.
        key: u64,
    },

    /// A point query returned more than one row.
    #[error("expected a single row for key {key}, found several")]
    MultipleRows {
        /// The queried key.
        key: u64,
    },

    /// A key was inserted twice.
    #[error("duplicate key {key}")]
    DuplicateKey {
        /// The duplicated key.
        key: u64,
    },

    /// The store was used before its table was created.
    #[error("table has not been created")]
    SchemaMissing,

    /// A scan returned a different number of records than were loaded.
    #[error("scan returned {actual} records, expected {expected}")]
    RowCount {
        /// Number of records in the dataset.
        expected: u64,
        /// Number of records the scan produced.
        actual: u64,
    },

    /// A result did not have the expected shape.
    #[error("malformed result: {context}")]
    Malformed {
        /// Description of the unexpected value.
        context: String,
    },
}

impl StoreError {
    /// Returns a closure wrapping a [`rusqlite::Error`] with the given context.
    pub(crate) fn sqlite(context: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |cause| Self::Sqlite {
            context: context.to_owned(),
            cause,
        }
    }

    pub(crate) fn malformed(context: impl Into<String>) -> Self {
        Self::Malformed {
            context: context.into(),
        }
    }
}

/// A value read from the store does not match the reference dataset.
#[derive(Debug, Error, PartialEq)]
#[error(
    "lookup #{index} of key {key}, field {field}: expected {:?}, got {:?}",
    String::from_utf8_lossy(.expected),
    String::from_utf8_lossy(.actual)
)]
pub struct VerificationError {
    /// Position of the failed lookup within the key sequence.
    pub index: usize,
    /// The looked-up key.
    pub key: u64,
    /// The looked-up field.
    pub field: usize,
    /// The value from the reference dataset.
    pub expected: Vec<u8>,
    /// The value returned by the store.
    pub actual: Vec<u8>,
}

/// Any error that aborts a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid benchmark parameters.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Out-of-range access to the reference dataset.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The backing store returned wrong data.
    #[error("verification failed: {0}")]
    Verification(#[from] VerificationError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for benchmark operations.
pub type Result<T, E = BenchError> = std::result::Result<T, E>;
