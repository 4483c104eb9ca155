//! Error types emitted by the zipstats CLI.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use zipstats_data::LoadError;

/// Errors emitted by the zipstats CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// An input path has an extension its source does not accept.
    #[error("{field} path {path:?} must have a {expected} extension (case-insensitive)")]
    UnsupportedExtension {
        field: &'static str,
        path: Utf8PathBuf,
        expected: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The event log file could not be opened.
    #[error("failed to open event log at {path:?}: {source}")]
    OpenEventLog {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing to the event log failed.
    #[error("failed to write event log: {source}")]
    WriteEventLog {
        #[source]
        source: io::Error,
    },
    /// Loading the datasets failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}
