//! Source ingestion for the ZIP-code statistics pipeline.
//!
//! Responsibilities:
//! - Tokenize comma-delimited text one character at a time.
//! - Flatten JSON observation documents into the same row shape.
//! - Validate rows per source and merge them into a region store.
//! - Keep the timestamped event log.
//!
//! Boundaries:
//! - Do not compute statistics (live in `zipstats-metrics`).
//! - Do not parse command-line input (lives in `zipstats-cli`).
//!
//! Invariants:
//! - Invalid rows are skipped and counted, never fatal.
//! - Malformed delimited text is fatal and reports its line and column.

#![forbid(unsafe_code)]

mod event_log;
mod format;
mod json;
mod load;
mod source;
mod tokenizer;
mod validate;

pub use event_log::EventLog;
pub use format::SourceFormat;
pub use json::{JSON_OBSERVATION_HEADER, JsonDocumentError, JsonRows, json_header, observation_rows};
pub use load::{
    DatasetSources, LoadError, LoadSummary, LoadedDataset, SourceCoverage, SourceError,
    SourceKind, load_dataset, load_observations, load_population, load_properties, load_source,
};
pub use source::{ByteSource, CharacterSource};
pub use tokenizer::{FormatError, FormatErrorKind, RowTokenizer, TokenizeError};
pub use validate::{
    MissingColumn, OBSERVATION_NUMERIC_COLUMNS, ObservationValidator, PopulationValidator,
    PropertyValidator, RecordValidator, RowRejection,
};
