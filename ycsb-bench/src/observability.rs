//! Logging setup for the benchmark binary.

use std::env;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Logs to stderr, so that stdout only carries the benchmark report.
///
/// With `verbose`, at least debug events are shown regardless of `RUST_LOG`.
pub fn init_tracing(verbose: bool) {
    let (level, env_filter) = parse_rust_log();
    let level = if verbose { level.max(Level::DEBUG) } else { level };
    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(format.with_filter(LevelFilter::from(level)))
        .with(env_filter)
        .init();
}

/// Returns the level to show and the filter bounding the maximum verbosity per crate.
pub fn parse_rust_log() -> (Level, EnvFilter) {
    // Try to parse RUST_LOG as a simple level filter and apply default levels internally.
    // Otherwise, use it literally if the user knows which overrides they want to run.
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<Level>() {
            Ok(level) => level,
            Err(_) => return (Level::TRACE, EnvFilter::new(value)),
        },
        Err(_) => Level::INFO,
    };

    // This is the maximum verbosity that will be logged, we filter this down to `level`.
    let env_filter = EnvFilter::new(
        "INFO,\
        ycsb=TRACE,\
        ycsb_bench=TRACE,\
        ",
    );

    (level, env_filter)
}
