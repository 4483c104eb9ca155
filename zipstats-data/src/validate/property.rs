use zipstats_core::{PropertyRecord, RegionId};

use super::{MissingColumn, RecordValidator, RowRejection, field, require_column};

const ZIP_CODE: &str = "zip_code";
const MARKET_VALUE: &str = "market_value";
const LIVABLE_AREA: &str = "total_livable_area";

/// Validator for the property-assessment source.
///
/// Only the ZIP code is checked here: its first five characters must be
/// ASCII digits. The numeric fields travel as text and are converted when
/// merged, so one unusable measure does not discard the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyValidator {
    zip_code: usize,
    market_value: usize,
    livable_area: usize,
}

impl RecordValidator for PropertyValidator {
    type Record = PropertyRecord;

    fn from_header(header: &[String]) -> Result<Self, MissingColumn> {
        Ok(Self {
            zip_code: require_column(header, ZIP_CODE)?,
            market_value: require_column(header, MARKET_VALUE)?,
            livable_area: require_column(header, LIVABLE_AREA)?,
        })
    }

    fn validate(&self, row: &[String]) -> Result<PropertyRecord, RowRejection> {
        let region = RegionId::parse_leading(field(row, self.zip_code, ZIP_CODE)?)?;
        Ok(PropertyRecord {
            region,
            market_value: field(row, self.market_value, MARKET_VALUE)?.to_owned(),
            livable_area: field(row, self.livable_area, LIVABLE_AREA)?.to_owned(),
        })
    }
}
