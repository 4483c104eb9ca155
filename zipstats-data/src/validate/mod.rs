//! Per-source row validation.
//!
//! Each source resolves its column positions from the header row once, then
//! checks every data row against the source's rules. A rejected row is
//! reported as a [`RowRejection`] so the loader can count and log it; it
//! never aborts the load.

use thiserror::Error;
use zipstats_core::{RegionIdError, TimestampError};

mod observation;
mod population;
mod property;


pub use observation::{OBSERVATION_NUMERIC_COLUMNS, ObservationValidator};
pub use population::PopulationValidator;
pub use property::PropertyValidator;

/// A required column was absent from the header row.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("header is missing required column {column:?}")]
pub struct MissingColumn {
    /// Name of the missing column.
    pub column: &'static str,
}

/// Reasons a data row is discarded.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowRejection {
    /// The row has fewer fields than a referenced column position.
    #[error("row has no field for column {column:?}")]
    MissingField {
        /// Column whose field was absent.
        column: &'static str,
    },
    /// The region identifier failed validation.
    #[error("invalid region identifier")]
    Region(#[from] RegionIdError),
    /// The observation timestamp failed validation.
    #[error("invalid observation timestamp")]
    Timestamp(#[from] TimestampError),
    /// A numeric field could not be parsed as a finite number.
    #[error("column {column:?} holds non-numeric value {raw:?}")]
    NotNumeric {
        /// Column holding the value.
        column: &'static str,
        /// The rejected text.
        raw: String,
    },
}

/// Validates data rows of one source against its header.
pub trait RecordValidator: Sized {
    /// Record produced for an accepted row.
    type Record;

    /// Resolve column positions from the header row.
    ///
    /// # Errors
    ///
    /// Returns [`MissingColumn`] when a column the source cannot do without
    /// is absent.
    fn from_header(header: &[String]) -> Result<Self, MissingColumn>;

    /// Check a data row, producing a record or the reason it was rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`RowRejection`] describing the first rule the row broke.
    fn validate(&self, row: &[String]) -> Result<Self::Record, RowRejection>;
}

/// Position of the first header cell equal to `column`.
fn find_column(header: &[String], column: &str) -> Option<usize> {
    header.iter().position(|cell| cell == column)
}

fn require_column(header: &[String], column: &'static str) -> Result<usize, MissingColumn> {
    find_column(header, column).ok_or(MissingColumn { column })
}

fn field<'row>(
    row: &'row [String],
    index: usize,
    column: &'static str,
) -> Result<&'row str, RowRejection> {
    row.get(index)
        .map(String::as_str)
        .ok_or(RowRejection::MissingField { column })
}

/// Parse a finite number, tolerating surrounding whitespace.
fn parse_finite(raw: &str, column: &'static str) -> Result<f64, RowRejection> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RowRejection::NotNumeric {
            column,
            raw: raw.to_owned(),
        })
}
