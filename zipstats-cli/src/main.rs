//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use zipstats_cli::CliError;

fn main() {
    match zipstats_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("zipstats: {err}");
            std::process::exit(1);
        }
    }
}
