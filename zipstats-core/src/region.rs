//! Region identifiers and the reconciled per-region record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::observation::{Observation, ObservationTimestamp};

/// A five-digit ZIP code identifying one region.
///
/// Identifiers order numerically and display zero-padded.
///
/// # Examples
///
/// ```
/// use zipstats_core::RegionId;
///
/// # fn main() -> Result<(), zipstats_core::RegionIdError> {
/// let id: RegionId = "19104".parse()?;
/// assert_eq!(id.get(), 19104);
/// assert_eq!(id.to_string(), "19104");
///
/// // Extended ZIP+4 codes keep only the leading five digits.
/// let truncated = RegionId::parse_leading("19104-2345")?;
/// assert_eq!(truncated, id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(u32);

/// Errors returned when parsing a [`RegionId`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegionIdError {
    /// The input did not have the expected length.
    #[error("region identifier must be {expected} characters, found {length}")]
    WrongLength {
        /// Required length (exact or minimum, depending on the parser).
        expected: usize,
        /// Length of the rejected input in bytes.
        length: usize,
    },
    /// The identifier contained something other than ASCII digits.
    #[error("region identifier {raw:?} contains non-digit characters")]
    NonDigit {
        /// The rejected input.
        raw: String,
    },
    /// A numeric identifier exceeded five digits.
    #[error("region identifier {value} exceeds five digits")]
    OutOfRange {
        /// The rejected value.
        value: u32,
    },
}

impl RegionId {
    /// Number of digits in a region identifier.
    pub const DIGITS: usize = 5;

    const MAX: u32 = 99_999;

    /// Build an identifier from its numeric value.
    pub const fn new(value: u32) -> Result<Self, RegionIdError> {
        if value > Self::MAX {
            return Err(RegionIdError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Parse an identifier that must be exactly five ASCII digits.
    pub fn parse_exact(raw: &str) -> Result<Self, RegionIdError> {
        if raw.len() != Self::DIGITS {
            return Err(RegionIdError::WrongLength {
                expected: Self::DIGITS,
                length: raw.len(),
            });
        }
        Self::from_digits(raw)
    }

    /// Parse the first five characters of an identifier at least five
    /// characters long, discarding the remainder.
    ///
    /// Property assessments carry ZIP+4 style codes, so this parser is
    /// deliberately looser than [`RegionId::parse_exact`].
    pub fn parse_leading(raw: &str) -> Result<Self, RegionIdError> {
        if raw.len() < Self::DIGITS {
            return Err(RegionIdError::WrongLength {
                expected: Self::DIGITS,
                length: raw.len(),
            });
        }
        let leading = raw
            .get(..Self::DIGITS)
            .ok_or_else(|| RegionIdError::NonDigit {
                raw: raw.to_owned(),
            })?;
        Self::from_digits(leading)
    }

    /// Numeric value of the identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    fn from_digits(digits: &str) -> Result<Self, RegionIdError> {
        if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(RegionIdError::NonDigit {
                raw: digits.to_owned(),
            });
        }
        let value = digits
            .bytes()
            .fold(0_u32, |acc, byte| acc * 10 + u32::from(byte - b'0'));
        Ok(Self(value))
    }
}

impl FromStr for RegionId {
    type Err = RegionIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse_exact(raw)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

/// Numeric property samples recorded per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyMeasure {
    /// Assessed market value of a property.
    MarketValue,
    /// Total livable area of a property.
    LivableArea,
}

/// The reconciled record for a single region.
///
/// A region is created by whichever source first mentions its identifier.
/// Population defaults to zero until a population record arrives; the
/// observation history stays empty unless the observation source covers the
/// region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    population: i64,
    observations: BTreeMap<ObservationTimestamp, Observation>,
    market_values: Vec<f64>,
    livable_areas: Vec<f64>,
}

impl Region {
    /// Create an empty region with zero population.
    #[must_use]
    pub const fn new(id: RegionId) -> Self {
        Self {
            id,
            population: 0,
            observations: BTreeMap::new(),
            market_values: Vec::new(),
            livable_areas: Vec::new(),
        }
    }

    /// Region identifier.
    #[must_use]
    pub const fn id(&self) -> RegionId {
        self.id
    }

    /// Population count, zero when unknown.
    #[must_use]
    pub const fn population(&self) -> i64 {
        self.population
    }

    /// Observation history ordered by timestamp.
    #[must_use]
    pub const fn observations(&self) -> &BTreeMap<ObservationTimestamp, Observation> {
        &self.observations
    }

    /// The observation with the greatest timestamp, if any.
    #[must_use]
    pub fn latest_observation(&self) -> Option<(&ObservationTimestamp, &Observation)> {
        self.observations.last_key_value()
    }

    /// The earliest observation recorded on `date` (`YYYY-MM-DD`).
    #[must_use]
    pub fn observation_on(&self, date: &str) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|(timestamp, _)| timestamp.date() == date)
            .map(|(_, observation)| observation)
    }

    /// Market value samples in arrival order.
    #[must_use]
    pub fn market_values(&self) -> &[f64] {
        &self.market_values
    }

    /// Livable area samples in arrival order.
    #[must_use]
    pub fn livable_areas(&self) -> &[f64] {
        &self.livable_areas
    }

    /// Samples for the requested property measure.
    #[must_use]
    pub fn property_samples(&self, measure: PropertyMeasure) -> &[f64] {
        match measure {
            PropertyMeasure::MarketValue => &self.market_values,
            PropertyMeasure::LivableArea => &self.livable_areas,
        }
    }

    pub(crate) fn record_observation(
        &mut self,
        timestamp: ObservationTimestamp,
        observation: Observation,
    ) -> Option<Observation> {
        self.observations.insert(timestamp, observation)
    }

    pub(crate) const fn set_population(&mut self, population: i64) {
        self.population = population;
    }

    pub(crate) fn push_sample(&mut self, measure: PropertyMeasure, sample: f64) {
        match measure {
            PropertyMeasure::MarketValue => self.market_values.push(sample),
            PropertyMeasure::LivableArea => self.livable_areas.push(sample),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("19104", 19104)]
    #[case("00501", 501)]
    #[case("99999", 99_999)]
    fn parses_exact_identifiers(#[case] raw: &str, #[case] expected: u32) {
        let id = RegionId::parse_exact(raw).expect("valid identifier");
        assert_eq!(id.get(), expected);
    }

    #[rstest]
    #[case("1910")]
    #[case("191044")]
    #[case("")]
    fn exact_parser_rejects_wrong_length(#[case] raw: &str) {
        let err = RegionId::parse_exact(raw).expect_err("length should be rejected");
        assert!(matches!(err, RegionIdError::WrongLength { .. }), "{err:?}");
    }

    #[rstest]
    #[case("1910a")]
    #[case("-1910")]
    #[case("1.0e4")]
    #[case("١٩١٠٤")]
    fn exact_parser_rejects_non_digits(#[case] raw: &str) {
        assert!(RegionId::parse_exact(raw).is_err());
    }

    #[rstest]
    #[case("19107XYZ", 19107)]
    #[case("19107-1234", 19107)]
    #[case("19107", 19107)]
    fn leading_parser_truncates(#[case] raw: &str, #[case] expected: u32) {
        let id = RegionId::parse_leading(raw).expect("leading digits are valid");
        assert_eq!(id.get(), expected);
    }

    #[rstest]
    #[case("1910")]
    #[case("X19107")]
    #[case("1910é")]
    fn leading_parser_rejects_short_or_non_numeric_prefix(#[case] raw: &str) {
        assert!(RegionId::parse_leading(raw).is_err());
    }

    #[rstest]
    fn displays_zero_padded() {
        let id = RegionId::new(501).expect("in range");
        assert_eq!(id.to_string(), "00501");
        assert!(RegionId::new(100_000).is_err());
    }

    #[rstest]
    fn latest_observation_uses_greatest_timestamp() {
        let mut region = Region::new(RegionId::new(19104).expect("in range"));
        for raw in ["2021-05-01 00:00:00", "2021-06-01 00:00:00", "2021-03-01 00:00:00"] {
            let timestamp = ObservationTimestamp::parse(raw).expect("valid timestamp");
            region.record_observation(timestamp, Observation::default());
        }
        let (latest, _) = region.latest_observation().expect("history present");
        assert_eq!(latest.as_str(), "2021-06-01 00:00:00");
    }
}
