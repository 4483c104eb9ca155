use zipstats_core::{PopulationRecord, RegionId};

use super::{MissingColumn, RecordValidator, RowRejection, field, parse_finite, require_column};

const ZIP_CODE: &str = "zip_code";
const POPULATION: &str = "population";

/// Validator for the population source.
///
/// The ZIP code must be exactly five ASCII digits and the population a
/// finite number. Fractional populations are truncated towards zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationValidator {
    zip_code: usize,
    population: usize,
}

impl RecordValidator for PopulationValidator {
    type Record = PopulationRecord;

    fn from_header(header: &[String]) -> Result<Self, MissingColumn> {
        Ok(Self {
            zip_code: require_column(header, ZIP_CODE)?,
            population: require_column(header, POPULATION)?,
        })
    }

    fn validate(&self, row: &[String]) -> Result<PopulationRecord, RowRejection> {
        let region = RegionId::parse_exact(field(row, self.zip_code, ZIP_CODE)?)?;
        let raw = field(row, self.population, POPULATION)?;
        let population = match raw.trim().parse::<i64>() {
            Ok(count) => count,
            Err(_) => truncate(parse_finite(raw, POPULATION)?),
        };
        Ok(PopulationRecord { region, population })
    }
}

// `as` saturates at the i64 bounds.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}
