//! Configuration for a benchmark run.
//!
//! Configuration can be loaded from multiple sources with the following precedence (highest to
//! lowest):
//!
//! 1. Environment variables (prefixed with `YCSB__`)
//! 2. YAML configuration file (specified via `-c` or `--config` flag)
//! 3. Defaults
//!
//! See [`Config`] for a description of all configuration fields and their defaults.
//!
//! # Environment Variables
//!
//! Environment variables use `YCSB__` as a prefix and double underscores (`__`) to denote nested
//! configuration structures. For example:
//!
//! - `YCSB__RECORD_COUNT=1000000` sets the number of records
//! - `YCSB__STORE__TYPE=sqlite` selects the SQLite store
//! - `YCSB__STORE__PATH=/tmp/ycsb.sqlite3` stores the database in a file
//!
//! # YAML Configuration File
//!
//! The above configuration in YAML format would look like this:
//!
//! ```yaml
//! record_count: 1000000
//!
//! store:
//!   type: sqlite
//!   path: /tmp/ycsb.sqlite3
//! ```

use std::path::Path;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetShape;
use crate::error::ConfigError;
use crate::random::DEFAULT_SEED;
use crate::store::Storage;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "YCSB__";

/// Main configuration struct for a benchmark run.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed of every random generator in the run.
    ///
    /// The dataset, the lookup keys and the field choices each start a fresh generator from this
    /// seed. Must not be zero.
    ///
    /// # Default
    ///
    /// `314159265`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__SEED`
    pub seed: u32,

    /// Number of records in the dataset.
    ///
    /// # Default
    ///
    /// `100000`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__RECORD_COUNT`
    pub record_count: u64,

    /// Number of fields per record.
    ///
    /// # Default
    ///
    /// `10`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__FIELD_COUNT`
    pub field_count: usize,

    /// Length of every field in bytes.
    ///
    /// # Default
    ///
    /// `100`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__FIELD_LENGTH`
    pub field_length: usize,

    /// Number of point lookups.
    ///
    /// # Default
    ///
    /// `1000000`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__TRANSACTIONS`
    pub transactions: usize,

    /// Zipfian skew of the lookup keys. `0` draws keys uniformly.
    ///
    /// # Default
    ///
    /// `0.99`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__THETA`
    pub theta: f64,

    /// Number of records inserted per batch while loading.
    ///
    /// # Default
    ///
    /// `1000`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__BATCH_SIZE`
    pub batch_size: usize,

    /// Record per-lookup latency percentiles.
    ///
    /// Adds two clock reads to every measured lookup.
    ///
    /// # Default
    ///
    /// `false`
    ///
    /// # Environment Variable
    ///
    /// `YCSB__LATENCIES`
    pub latencies: bool,

    /// The store under benchmark.
    ///
    /// # Default
    ///
    /// In-memory SQLite database.
    ///
    /// # Environment Variables
    ///
    /// - `YCSB__STORE__TYPE=memory|sqlite`
    /// - `YCSB__STORE__PATH=/path/to/db` (sqlite only, optional)
    pub store: Storage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            record_count: 100_000,
            field_count: 10,
            field_length: 100,
            transactions: 1_000_000,
            theta: 0.99,
            batch_size: 1000,
            latencies: false,
            store: Storage::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the provided arguments.
    ///
    /// Configuration is merged in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. YAML configuration file (if provided in `args`)
    /// 3. Environment variables (prefixed with `YCSB__`)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Dimensions of the dataset.
    pub fn shape(&self) -> DatasetShape {
        DatasetShape {
            record_count: self.record_count,
            field_count: self.field_count,
            field_length: self.field_length,
        }
    }

    /// Checks all parameters before any work is done.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed == 0 {
            return Err(ConfigError::ZeroSeed);
        }
        if !self.theta.is_finite() || self.theta < 0.0 {
            return Err(ConfigError::InvalidTheta(self.theta));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        self.shape().validate()
    }
}
