//! Workload drivers measuring a loaded store.
//!
//! - [`lookup`]: skewed single-field point reads, each verified against the reference dataset.
//! - [`scan`]: one sequential pass over every field of every record.
//!
//! Both drivers time exactly their loop of store requests and stop at the first error.

pub mod lookup;
pub mod scan;

pub use lookup::{LookupOptions, LookupReport, run_lookups};
pub use scan::{ScanReport, run_scan};
