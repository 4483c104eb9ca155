use zipstats_core::{Observation, ObservationRecord, ObservationTimestamp, RegionId};

use super::{
    MissingColumn, RecordValidator, RowRejection, field, find_column, parse_finite,
    require_column,
};

const ZIP_CODE: &str = "zip_code";
const TIMESTAMP: &str = "etl_timestamp";

/// Numeric observation columns, in [`Observation`] field order.
///
/// Absent columns and empty fields count as zero.
pub const OBSERVATION_NUMERIC_COLUMNS: [&str; 7] = [
    "partially_vaccinated",
    "fully_vaccinated",
    "NEG",
    "POS",
    "deaths",
    "hospitalized",
    "boosted",
];

/// Validator for the health-observation source.
///
/// A row is accepted when its `zip_code` is exactly five ASCII digits, its
/// `etl_timestamp` has the `YYYY-MM-DD hh:mm:ss` shape, and every numeric
/// field present is empty or a finite number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationValidator {
    zip_code: usize,
    timestamp: usize,
    numeric: [Option<usize>; 7],
}

impl RecordValidator for ObservationValidator {
    type Record = ObservationRecord;

    fn from_header(header: &[String]) -> Result<Self, MissingColumn> {
        Ok(Self {
            zip_code: require_column(header, ZIP_CODE)?,
            timestamp: require_column(header, TIMESTAMP)?,
            numeric: OBSERVATION_NUMERIC_COLUMNS.map(|column| find_column(header, column)),
        })
    }

    fn validate(&self, row: &[String]) -> Result<ObservationRecord, RowRejection> {
        let region = RegionId::parse_exact(field(row, self.zip_code, ZIP_CODE)?)?;
        let timestamp = ObservationTimestamp::parse(field(row, self.timestamp, TIMESTAMP)?)?;

        let mut values = [0.0_f64; 7];
        for ((slot, column), index) in values
            .iter_mut()
            .zip(OBSERVATION_NUMERIC_COLUMNS)
            .zip(self.numeric)
        {
            let Some(index) = index else { continue };
            let raw = field(row, index, column)?;
            if !raw.is_empty() {
                *slot = parse_finite(raw, column)?;
            }
        }
        let [
            partially_vaccinated,
            fully_vaccinated,
            negative_tests,
            positive_tests,
            deaths,
            hospitalized,
            boosted,
        ] = values;

        Ok(ObservationRecord {
            region,
            timestamp,
            observation: Observation {
                partially_vaccinated,
                fully_vaccinated,
                negative_tests,
                positive_tests,
                deaths,
                hospitalized,
                boosted,
            },
        })
    }
}
