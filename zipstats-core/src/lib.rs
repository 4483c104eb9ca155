//! Core domain types for the zipstats workspace.
//!
//! A [`Region`] is the reconciled record for one five-digit ZIP code. Regions
//! are assembled by a [`RegionStoreBuilder`] from validated records supplied
//! by three independent sources (health observations, population counts and
//! property assessments) and then frozen into a read-only [`RegionStore`]
//! for querying.
//!
//! Constructors for identifiers and timestamps return `Result` so malformed
//! values are rejected before they reach the store.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod observation;
pub mod record;
pub mod region;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use observation::{
    CalendarDate, CalendarDateError, Observation, ObservationTimestamp, TimestampError,
    VaccinationKind,
};
pub use record::{ObservationRecord, PopulationRecord, PropertyRecord};
pub use region::{PropertyMeasure, Region, RegionId, RegionIdError};
pub use store::{PropertyMerge, RegionStore, RegionStoreBuilder};
