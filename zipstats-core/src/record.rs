//! Validated rows handed from the source validators to the store.
//!
//! Each type corresponds to one source. Values reaching these types have
//! already passed the per-source identifier and format checks.

use crate::observation::{Observation, ObservationTimestamp};
use crate::region::RegionId;

/// A validated row from the health-observation source.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    /// Region the observation describes.
    pub region: RegionId,
    /// When the observation was taken.
    pub timestamp: ObservationTimestamp,
    /// The observed values.
    pub observation: Observation,
}

/// A validated row from the population source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationRecord {
    /// Region the count applies to.
    pub region: RegionId,
    /// Number of residents.
    pub population: i64,
}

/// A validated row from the property-assessment source.
///
/// Market value and livable area stay as raw text. They are converted
/// independently when merged, so an unusable market value does not discard
/// the livable area of the same property (and vice versa).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRecord {
    /// Region derived from the leading five digits of the ZIP code.
    pub region: RegionId,
    /// Raw `market_value` text.
    pub market_value: String,
    /// Raw `total_livable_area` text.
    pub livable_area: String,
}

impl PropertyRecord {
    /// Parsed market value, if the text is a finite number.
    #[must_use]
    pub fn market_value_sample(&self) -> Option<f64> {
        parse_sample(&self.market_value)
    }

    /// Parsed livable area, if the text is a finite number.
    #[must_use]
    pub fn livable_area_sample(&self) -> Option<f64> {
        parse_sample(&self.livable_area)
    }
}

fn parse_sample(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
