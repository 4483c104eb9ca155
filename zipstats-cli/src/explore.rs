//! The `explore` subcommand: layered configuration, input checks and the
//! wiring from loaded data to the interactive session.

use std::io::{self, BufRead, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use zipstats_data::{DatasetSources, EventLog, SourceFormat, load_dataset};
use zipstats_metrics::MetricsEngine;

use crate::session::Session;
use crate::{ARG_COVID, ARG_LOG, ARG_POPULATION, ARG_PROPERTIES, CliError};

const DELIMITED_ONLY: &[SourceFormat] = &[SourceFormat::DelimitedText];
const DELIMITED_OR_DOCUMENT: &[SourceFormat] =
    &[SourceFormat::DelimitedText, SourceFormat::StructuredDocument];

/// CLI arguments for the `explore` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load any combination of the observation, population and \
                 property datasets, then answer questions about them from \
                 an interactive menu. Paths can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Load the datasets and explore them interactively"
)]
#[ortho_config(prefix = "ZIPSTATS")]
pub(crate) struct ExploreArgs {
    /// Path to the health observations (`.csv` or `.json`).
    #[arg(long = ARG_COVID, value_name = "path")]
    #[serde(default)]
    pub(crate) covid: Option<Utf8PathBuf>,
    /// Path to the population counts (`.csv`).
    #[arg(long = ARG_POPULATION, value_name = "path")]
    #[serde(default)]
    pub(crate) population: Option<Utf8PathBuf>,
    /// Path to the property assessments (`.csv`).
    #[arg(long = ARG_PROPERTIES, value_name = "path")]
    #[serde(default)]
    pub(crate) properties: Option<Utf8PathBuf>,
    /// File that receives the event log. Standard error when omitted.
    #[arg(long = ARG_LOG, value_name = "path")]
    #[serde(default)]
    pub(crate) log: Option<Utf8PathBuf>,
}

impl ExploreArgs {
    pub(crate) fn into_config(self) -> Result<ExploreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ExploreConfig::from(merged))
    }
}

/// Resolved inputs for one exploration session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExploreConfig {
    pub(crate) covid: Option<Utf8PathBuf>,
    pub(crate) population: Option<Utf8PathBuf>,
    pub(crate) properties: Option<Utf8PathBuf>,
    pub(crate) log: Option<Utf8PathBuf>,
}

impl From<ExploreArgs> for ExploreConfig {
    fn from(args: ExploreArgs) -> Self {
        Self {
            covid: args.covid,
            population: args.population,
            properties: args.properties,
            log: args.log,
        }
    }
}

impl ExploreConfig {
    /// Check extensions first, then existence, for each input in turn.
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let inputs = [
            (ARG_COVID, self.covid.as_deref(), DELIMITED_OR_DOCUMENT),
            (ARG_POPULATION, self.population.as_deref(), DELIMITED_ONLY),
            (ARG_PROPERTIES, self.properties.as_deref(), DELIMITED_ONLY),
        ];
        for (field, path, accepted) in inputs {
            let Some(path) = path else { continue };
            Self::require_format(path, field, accepted)?;
            Self::require_existing(path, field)?;
        }
        Ok(())
    }

    fn require_format(
        path: &Utf8Path,
        field: &'static str,
        accepted: &'static [SourceFormat],
    ) -> Result<(), CliError> {
        match SourceFormat::from_path(path) {
            Some(format) if accepted.contains(&format) => Ok(()),
            _ => Err(CliError::UnsupportedExtension {
                field,
                path: path.to_path_buf(),
                expected: if accepted.len() > 1 {
                    ".csv or .json"
                } else {
                    ".csv"
                },
            }),
        }
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match zipstats_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub(crate) fn sources(&self) -> DatasetSources {
        DatasetSources {
            observations: self.covid.clone(),
            population: self.population.clone(),
            properties: self.properties.clone(),
        }
    }

    /// Configured paths joined by single spaces, in flag order.
    pub(crate) fn describe_inputs(&self) -> String {
        [&self.covid, &self.population, &self.properties, &self.log]
            .into_iter()
            .flatten()
            .map(|path| path.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn open_event_log(&self) -> Result<EventLog, CliError> {
        match &self.log {
            Some(path) => EventLog::append_to(path).map_err(|source| CliError::OpenEventLog {
                path: path.clone(),
                source,
            }),
            None => Ok(EventLog::stderr()),
        }
    }
}

/// Load the configured sources and hand them to an interactive session.
pub(crate) fn run_explore<R, W, E>(
    config: &ExploreConfig,
    input: R,
    output: W,
    complaints: E,
) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut event_log = config.open_event_log()?;
    event_log
        .record(config.describe_inputs())
        .map_err(|source| CliError::WriteEventLog { source })?;
    let dataset = load_dataset(&config.sources(), &mut event_log)?;
    info!("loaded {} regions", dataset.store.len());
    let engine = MetricsEngine::new(dataset.store);
    Session::new(engine, dataset.coverage, &mut event_log, input, output, complaints).run()
}
