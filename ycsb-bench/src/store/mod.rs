//! The interface to the data store under benchmark, and its implementations.
//!
//! The harness only needs three things from a store: bulk-loading batches of records, reading a
//! single field of a single record, and scanning all records in key order. Everything else about
//! the store (schema language, statement handling, storage format) stays behind [`Store`].

use std::fmt::Debug;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dataset::{Batch, DatasetShape};
use crate::error::StoreResult;

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// A type-erased [`Store`] instance.
pub type BoxedStore = Box<dyn Store>;

/// A data store that can be loaded with a dataset and benchmarked.
///
/// All calls are synchronous. Any error is final: the harness never retries.
pub trait Store: Debug {
    /// The store name, used for diagnostics.
    fn name(&self) -> &'static str;

    /// Creates the table holding records of the given shape.
    fn create_table(&mut self, shape: &DatasetShape) -> StoreResult<()>;

    /// Inserts all records of the batch atomically.
    ///
    /// Batches arrive in ascending key order.
    fn insert_batch(&mut self, batch: &Batch<'_>) -> StoreResult<()>;

    /// Reads a single field of the record with the given key into `out`.
    ///
    /// `out` is cleared first. Returns `false` if there is no such record. Finding more than one
    /// matching row is an error.
    fn read_field(&mut self, key: u64, field: usize, out: &mut Vec<u8>) -> StoreResult<bool>;

    /// Visits every record in ascending key order, one at a time.
    ///
    /// Stops at the first error returned by the store or by `visit`.
    fn scan(&mut self, visit: &mut dyn FnMut(&dyn ScanRow) -> StoreResult<()>) -> StoreResult<()>;
}

/// The current record of a [`Store::scan`].
pub trait ScanRow {
    /// The record's key.
    fn key(&self) -> StoreResult<u64>;

    /// The value of the field with the given index.
    fn field(&self, index: usize) -> StoreResult<&[u8]>;
}

/// Store backend configuration.
///
/// The `type` field in YAML or `__TYPE` in environment variables determines which variant is
/// used.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Storage {
    /// Ordered in-memory map (type `"memory"`).
    ///
    /// Measures the overhead of the harness itself.
    Memory,

    /// SQLite database (type `"sqlite"`).
    ///
    /// # Example
    ///
    /// ```yaml
    /// store:
    ///   type: sqlite
    ///   path: /tmp/ycsb.sqlite3
    /// ```
    Sqlite {
        /// Database file. Without a path, the database lives in memory.
        path: Option<PathBuf>,
    },
}

impl Default for Storage {
    fn default() -> Self {
        Self::Sqlite { path: None }
    }
}

/// Opens the store described by `storage`.
pub fn open(storage: &Storage) -> StoreResult<BoxedStore> {
    Ok(match storage {
        Storage::Memory => Box::new(InMemoryStore::new()),
        Storage::Sqlite { path: None } => Box::new(SqliteStore::in_memory()?),
        Storage::Sqlite { path: Some(path) } => Box::new(SqliteStore::open(path)?),
    })
}

/// Converts a dataset key into an SQL integer.
pub(crate) fn sql_key(key: u64) -> StoreResult<i64> {
    i64::try_from(key)
        .map_err(|_| crate::error::StoreError::malformed(format!("key {key} exceeds i64")))
}
