//! Adapter presenting a JSON observation document as delimited rows.
//!
//! The document must be an array of objects. Each object becomes one row
//! under the fixed header [`JSON_OBSERVATION_HEADER`], so the observation
//! validator applies unchanged. Keys that are absent or `null` read as `"0"`.

use simd_json::{OwnedValue, StaticNode};
use simd_json::prelude::*;
use thiserror::Error;

/// Column order used for rows produced from a JSON document.
pub const JSON_OBSERVATION_HEADER: [&str; 9] = [
    "zip_code",
    "NEG",
    "POS",
    "deaths",
    "hospitalized",
    "partially_vaccinated",
    "fully_vaccinated",
    "boosted",
    "etl_timestamp",
];

const ABSENT: &str = "0";

/// Errors raised while reading a JSON observation document.
#[derive(Debug, Error)]
pub enum JsonDocumentError {
    /// The bytes are not valid JSON.
    #[error("failed to parse JSON document")]
    Parse(#[from] simd_json::Error),
    /// The document parsed but its top level is not an array.
    #[error("expected a top-level array of objects")]
    NotAnArray,
}

/// Rows extracted from a JSON observation document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonRows {
    /// One row per object, ordered as [`JSON_OBSERVATION_HEADER`].
    pub rows: Vec<Vec<String>>,
    /// Array elements that were not objects.
    pub skipped: usize,
}

/// The fixed header as owned cells.
#[must_use]
pub fn json_header() -> Vec<String> {
    JSON_OBSERVATION_HEADER.map(str::to_owned).to_vec()
}

/// Parse a JSON document in place and flatten its objects into rows.
///
/// simd-json rewrites the buffer while parsing, hence the mutable slice.
///
/// # Errors
///
/// Returns [`JsonDocumentError`] when the bytes are not JSON or the top level
/// is not an array.
pub fn observation_rows(bytes: &mut [u8]) -> Result<JsonRows, JsonDocumentError> {
    let document = simd_json::to_owned_value(bytes)?;
    let elements = document.as_array().ok_or(JsonDocumentError::NotAnArray)?;
    let mut extracted = JsonRows::default();
    for element in elements {
        let Some(object) = element.as_object() else {
            extracted.skipped += 1;
            continue;
        };
        let row = JSON_OBSERVATION_HEADER
            .iter()
            .map(|key| {
                object
                    .get(*key)
                    .and_then(cell_text)
                    .unwrap_or_else(|| ABSENT.to_owned())
            })
            .collect();
        extracted.rows.push(row);
    }
    Ok(extracted)
}

fn cell_text(value: &OwnedValue) -> Option<String> {
    match value {
        OwnedValue::String(text) => Some(text.clone()),
        OwnedValue::Static(StaticNode::Null) => None,
        other => Some(other.to_string()),
    }
}
