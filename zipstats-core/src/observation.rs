//! Timestamped health observations.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

// `\d` in the regex crate matches any Unicode digit; only ASCII digits count.
static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$")
        .unwrap_or_else(|err| panic!("timestamp pattern must compile: {err}"))
});

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$")
        .unwrap_or_else(|err| panic!("date pattern must compile: {err}"))
});

/// An observation timestamp in `YYYY-MM-DD hh:mm:ss` form.
///
/// Only the shape is checked; `2021-13-45 99:99:99` is accepted. Timestamps
/// order lexicographically, which matches chronological order for this
/// format.
///
/// # Examples
///
/// ```
/// use zipstats_core::ObservationTimestamp;
///
/// # fn main() -> Result<(), zipstats_core::TimestampError> {
/// let timestamp = ObservationTimestamp::parse("2021-05-28 17:20:02")?;
/// assert_eq!(timestamp.date(), "2021-05-28");
/// assert!(ObservationTimestamp::parse("2021-05-28").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationTimestamp(String);

/// Error returned for text that is not a `YYYY-MM-DD hh:mm:ss` timestamp.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("timestamp {raw:?} does not match YYYY-MM-DD hh:mm:ss")]
pub struct TimestampError {
    /// The rejected input.
    pub raw: String,
}

impl ObservationTimestamp {
    /// Validate and wrap a timestamp.
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        if TIMESTAMP_PATTERN.is_match(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(TimestampError {
                raw: raw.to_owned(),
            })
        }
    }

    /// The calendar date portion (`YYYY-MM-DD`).
    #[must_use]
    pub fn date(&self) -> &str {
        self.0.split_once(' ').map_or(self.0.as_str(), |(date, _)| date)
    }

    /// The full timestamp text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObservationTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar date in `YYYY-MM-DD` form, used to select observations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(String);

/// Error returned for text that is not a `YYYY-MM-DD` date.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("date {raw:?} does not match YYYY-MM-DD")]
pub struct CalendarDateError {
    /// The rejected input.
    pub raw: String,
}

impl CalendarDate {
    /// Validate and wrap a date.
    pub fn parse(raw: &str) -> Result<Self, CalendarDateError> {
        if DATE_PATTERN.is_match(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(CalendarDateError {
                raw: raw.to_owned(),
            })
        }
    }

    /// The date text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selects partial or full vaccination counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VaccinationKind {
    /// People with at least one dose.
    Partial,
    /// People with a completed course.
    Full,
}

/// One health-data sample for a region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Observation {
    /// Partially vaccinated people.
    pub partially_vaccinated: f64,
    /// Fully vaccinated people.
    pub fully_vaccinated: f64,
    /// Negative test results.
    pub negative_tests: f64,
    /// Positive test results.
    pub positive_tests: f64,
    /// Deaths.
    pub deaths: f64,
    /// Hospitalisations.
    pub hospitalized: f64,
    /// Booster doses.
    pub boosted: f64,
}

impl Observation {
    /// Vaccination count for the requested kind.
    #[must_use]
    pub const fn vaccinations(&self, kind: VaccinationKind) -> f64 {
        match kind {
            VaccinationKind::Partial => self.partially_vaccinated,
            VaccinationKind::Full => self.fully_vaccinated,
        }
    }

    /// Partial plus full vaccinations.
    #[must_use]
    pub fn total_vaccinated(&self) -> f64 {
        self.partially_vaccinated + self.fully_vaccinated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2021-05-28 17:20:02")]
    #[case("0000-00-00 00:00:00")]
    fn accepts_well_formed_timestamps(#[case] raw: &str) {
        assert!(ObservationTimestamp::parse(raw).is_ok());
    }

    #[rstest]
    #[case("2021-05-28")]
    #[case("2021-05-28T17:20:02")]
    #[case("2021-05-28 17:20:02 ")]
    #[case(" 2021-05-28 17:20:02")]
    #[case("2021-5-28 17:20:02")]
    #[case("２021-05-28 17:20:02")]
    #[case("")]
    fn rejects_malformed_timestamps(#[case] raw: &str) {
        let err = ObservationTimestamp::parse(raw).expect_err("malformed timestamp");
        assert_eq!(err.raw, raw);
    }

    #[rstest]
    fn timestamps_order_chronologically() {
        let earlier = ObservationTimestamp::parse("2021-05-28 23:59:59").expect("valid");
        let later = ObservationTimestamp::parse("2021-05-29 00:00:00").expect("valid");
        assert!(earlier < later);
    }

    #[rstest]
    #[case("2021-05-28", true)]
    #[case("2021-05-28 00:00:00", false)]
    #[case("21-05-28", false)]
    fn validates_calendar_dates(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(CalendarDate::parse(raw).is_ok(), valid);
    }

    #[rstest]
    fn selects_vaccination_counts() {
        let observation = Observation {
            partially_vaccinated: 100.0,
            fully_vaccinated: 50.0,
            ..Observation::default()
        };
        assert_eq!(observation.vaccinations(VaccinationKind::Partial), 100.0);
        assert_eq!(observation.vaccinations(VaccinationKind::Full), 50.0);
        assert_eq!(observation.total_vaccinated(), 150.0);
    }
}
