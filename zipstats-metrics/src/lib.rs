//! Statistics over a loaded region store.
//!
//! [`MetricsEngine`] takes ownership of a frozen
//! [`RegionStore`](zipstats_core::RegionStore) and answers queries about it.
//! Every answer is cached under the full set of query parameters and never
//! invalidated, since the store cannot change once loading has finished.
//!
//! # Examples
//!
//! ```
//! use zipstats_core::{PopulationRecord, RegionId, RegionStoreBuilder};
//! use zipstats_metrics::MetricsEngine;
//!
//! # fn main() -> Result<(), zipstats_core::RegionIdError> {
//! let mut builder = RegionStoreBuilder::new();
//! builder.merge_population(PopulationRecord {
//!     region: RegionId::parse_exact("19104")?,
//!     population: 1000,
//! });
//! builder.merge_population(PopulationRecord {
//!     region: RegionId::parse_exact("19108")?,
//!     population: 500,
//! });
//!
//! let mut engine = MetricsEngine::new(builder.finish());
//! assert_eq!(engine.total_population(), 1500);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap};

use log::debug;
use zipstats_core::{
    CalendarDate, PropertyMeasure, Region, RegionId, RegionStore, VaccinationKind,
};


/// Per-region values in ascending identifier order.
pub type RegionRates = BTreeMap<RegionId, f64>;

/// Unvaccinated people are reported per this many units of livable area.
pub const LIVABLE_AREA_UNIT: f64 = 100.0;

/// Memoized query engine over a frozen store.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    store: RegionStore,
    total_population: Option<i64>,
    vaccination_rates: HashMap<(CalendarDate, VaccinationKind), RegionRates>,
    averages: HashMap<(RegionId, PropertyMeasure), i64>,
    per_capita: HashMap<(RegionId, PropertyMeasure), i64>,
    unvaccinated_per_area: Option<RegionRates>,
    computations: usize,
}

impl MetricsEngine {
    /// Take ownership of a loaded store.
    #[must_use]
    pub fn new(store: RegionStore) -> Self {
        Self {
            store,
            total_population: None,
            vaccination_rates: HashMap::new(),
            averages: HashMap::new(),
            per_capita: HashMap::new(),
            unvaccinated_per_area: None,
            computations: 0,
        }
    }

    /// The store being queried.
    #[must_use]
    pub const fn store(&self) -> &RegionStore {
        &self.store
    }

    /// Number of queries answered by computing rather than from the cache.
    #[must_use]
    pub const fn computations(&self) -> usize {
        self.computations
    }

    /// Sum of every region's population.
    pub fn total_population(&mut self) -> i64 {
        *self.total_population.get_or_insert_with(|| {
            self.computations += 1;
            self.store
                .regions()
                .map(Region::population)
                .fold(0, i64::saturating_add)
        })
    }

    /// Vaccinations per resident on `date` for every populated region.
    ///
    /// Regions with zero population are left out. A populated region with
    /// no observation on `date` maps to `0.0`. When several observations
    /// fall on the same date, the earliest is used.
    pub fn vaccination_rate_per_capita(
        &mut self,
        date: &CalendarDate,
        kind: VaccinationKind,
    ) -> &RegionRates {
        self.vaccination_rates
            .entry((date.clone(), kind))
            .or_insert_with(|| {
                self.computations += 1;
                debug!("computing {kind:?} vaccination rates for {date}");
                vaccination_rates(&self.store, date, kind)
            })
    }

    /// Mean of the region's samples for `measure`, truncated towards zero.
    ///
    /// Unknown regions and regions without samples yield zero.
    pub fn average(&mut self, region: RegionId, measure: PropertyMeasure) -> i64 {
        *self.averages.entry((region, measure)).or_insert_with(|| {
            self.computations += 1;
            self.store
                .get(region)
                .map_or(0, |entity| mean(entity.property_samples(measure)))
        })
    }

    /// Sum of the region's samples for `measure` divided by its population,
    /// truncated towards zero.
    ///
    /// Unknown regions, regions without samples and regions with zero
    /// population yield zero.
    pub fn per_capita(&mut self, region: RegionId, measure: PropertyMeasure) -> i64 {
        *self.per_capita.entry((region, measure)).or_insert_with(|| {
            self.computations += 1;
            self.store.get(region).map_or(0, |entity| {
                total_per_capita(entity.property_samples(measure), entity.population())
            })
        })
    }

    /// Average assessed market value in `region`.
    pub fn average_market_value(&mut self, region: RegionId) -> i64 {
        self.average(region, PropertyMeasure::MarketValue)
    }

    /// Average livable area in `region`.
    pub fn average_livable_area(&mut self, region: RegionId) -> i64 {
        self.average(region, PropertyMeasure::LivableArea)
    }

    /// Total market value per resident of `region`.
    pub fn market_value_per_capita(&mut self, region: RegionId) -> i64 {
        self.per_capita(region, PropertyMeasure::MarketValue)
    }

    /// Total livable area per resident of `region`.
    pub fn livable_area_per_capita(&mut self, region: RegionId) -> i64 {
        self.per_capita(region, PropertyMeasure::LivableArea)
    }

    /// Unvaccinated residents per [`LIVABLE_AREA_UNIT`] of livable area.
    ///
    /// Uses each region's most recent observation. Regions without
    /// observations, without positive livable area, or with a non-positive
    /// result are left out.
    pub fn unvaccinated_per_area(&mut self) -> &RegionRates {
        self.unvaccinated_per_area.get_or_insert_with(|| {
            self.computations += 1;
            unvaccinated_per_area(&self.store)
        })
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "rates divide vaccination counts by population"
)]
fn vaccination_rates(store: &RegionStore, date: &CalendarDate, kind: VaccinationKind) -> RegionRates {
    store
        .regions()
        .filter(|region| region.population() > 0)
        .map(|region| {
            let rate = region
                .observation_on(date.as_str())
                .map_or(0.0, |observation| {
                    observation.vaccinations(kind) / population_as_f64(region.population())
                });
            (region.id(), rate)
        })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "an average divides the sample sum by the sample count"
)]
fn mean(samples: &[f64]) -> i64 {
    if samples.is_empty() {
        return 0;
    }
    truncate(samples.iter().sum::<f64>() / count_as_f64(samples.len()))
}

#[expect(
    clippy::float_arithmetic,
    reason = "per-capita figures divide the sample sum by population"
)]
fn total_per_capita(samples: &[f64], population: i64) -> i64 {
    if samples.is_empty() || population == 0 {
        return 0;
    }
    truncate(samples.iter().sum::<f64>() / population_as_f64(population))
}

#[expect(
    clippy::float_arithmetic,
    reason = "density combines population, vaccination counts and area"
)]
fn unvaccinated_per_area(store: &RegionStore) -> RegionRates {
    store
        .regions()
        .filter_map(|region| {
            let (_, latest) = region.latest_observation()?;
            let area = region.livable_areas().iter().sum::<f64>();
            if area <= 0.0 {
                return None;
            }
            let unvaccinated = population_as_f64(region.population()) - latest.total_vaccinated();
            let density = unvaccinated / area * LIVABLE_AREA_UNIT;
            (density > 0.0).then_some((region.id(), density))
        })
        .collect()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "populations stay far below 2^53"
)]
const fn population_as_f64(population: i64) -> f64 {
    population as f64
}

#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts stay far below 2^53"
)]
const fn count_as_f64(count: usize) -> f64 {
    count as f64
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "results are truncated towards zero and saturate at the i64 bounds"
)]
const fn truncate(value: f64) -> i64 {
    value as i64
}
