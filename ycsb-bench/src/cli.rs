//! Command line interface of the `ycsb` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;

use crate::config::Config;
use crate::{observability, report, run, store};

/// YCSB-style point-lookup and full-scan benchmark.
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,

    /// log debug output, such as every inserted batch
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    #[argh(subcommand)]
    pub command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Run(RunCommand),
    Version(VersionCommand),
}

/// generate, load, and benchmark the configured store
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "run")]
struct RunCommand {}

/// print the benchmark version
#[derive(Default, Debug, FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCommand {}

/// Parse the arguments and execute the CLI command.
pub fn execute() -> Result<()> {
    let args: Args = argh::from_env();

    // Special switch to just print the version and exit.
    if let Command::Version(_) = args.command {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    observability::init_tracing(args.verbose);

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config);

    let mut store = store::open(&config.store).context("failed to open store")?;
    match run::run(store.as_mut(), &config) {
        Ok(report) => {
            report::print_report(store.name(), &report);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = &err as &dyn std::error::Error, "benchmark aborted");
            Err(err.into())
        }
    }
}
