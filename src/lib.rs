//! Facade crate for ZIP-code region reconciliation.
//!
//! This crate re-exports the region model, the source loaders and the
//! memoising metrics engine, so callers can load the observation, population
//! and property sources and query them through a single dependency.

#![forbid(unsafe_code)]

pub use zipstats_core::{
    CalendarDate, Observation, ObservationTimestamp, PropertyMeasure, Region, RegionId,
    RegionIdError, RegionStore, RegionStoreBuilder, VaccinationKind,
};

pub use zipstats_data::{
    DatasetSources, EventLog, LoadError, LoadSummary, LoadedDataset, SourceCoverage, SourceFormat,
    SourceKind, load_dataset, load_source,
};

pub use zipstats_metrics::{LIVABLE_AREA_UNIT, MetricsEngine, RegionRates};

#[cfg(feature = "test-support")]
pub use zipstats_core::test_support;
