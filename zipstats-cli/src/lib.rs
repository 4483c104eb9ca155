//! Command-line interface for exploring reconciled ZIP-code statistics.
#![forbid(unsafe_code)]

use std::io;

use clap::{Parser, Subcommand};

mod error;
mod explore;
mod session;

pub use error::CliError;

use explore::{ExploreArgs, ExploreConfig, run_explore};

const ARG_COVID: &str = "covid";
const ARG_POPULATION: &str = "population";
const ARG_PROPERTIES: &str = "properties";
const ARG_LOG: &str = "log";

/// Run the zipstats CLI with the current process arguments and environment.
///
/// The interactive session reads from standard input, prints results to
/// standard output and prints input complaints to standard error.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Explore(args) => {
            let config = resolve_explore(args)?;
            run_explore(
                &config,
                io::stdin().lock(),
                io::stdout().lock(),
                io::stderr().lock(),
            )
        }
    }
}

fn resolve_explore(args: ExploreArgs) -> Result<ExploreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

#[derive(Debug, Parser)]
#[command(
    name = "zipstats",
    about = "Reconcile per-ZIP health, population and property data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the datasets and answer questions from an interactive menu.
    Explore(ExploreArgs),
}

#[cfg(test)]
mod tests;
