//! Store fixtures shared by unit and behaviour tests across the workspace.

use crate::{
    Observation, ObservationRecord, ObservationTimestamp, PopulationRecord, PropertyRecord,
    RegionId, RegionStore, RegionStoreBuilder,
};

/// Build a [`RegionId`], panicking on values outside five digits.
#[must_use]
pub fn region(value: u32) -> RegionId {
    RegionId::new(value).unwrap_or_else(|err| panic!("fixture region {value}: {err}"))
}

/// Build an observation record carrying only vaccination counts.
#[must_use]
pub fn vaccination_record(
    region_id: u32,
    timestamp: &str,
    partial: f64,
    full: f64,
) -> ObservationRecord {
    ObservationRecord {
        region: region(region_id),
        timestamp: ObservationTimestamp::parse(timestamp)
            .unwrap_or_else(|err| panic!("fixture timestamp {timestamp}: {err}")),
        observation: Observation {
            partially_vaccinated: partial,
            fully_vaccinated: full,
            ..Observation::default()
        },
    }
}

/// Build a population record.
#[must_use]
pub fn population_record(region_id: u32, population: i64) -> PopulationRecord {
    PopulationRecord {
        region: region(region_id),
        population,
    }
}

/// Build a property record from raw market value and livable area text.
#[must_use]
pub fn property_record(region_id: u32, market_value: &str, livable_area: &str) -> PropertyRecord {
    PropertyRecord {
        region: region(region_id),
        market_value: market_value.to_owned(),
        livable_area: livable_area.to_owned(),
    }
}

/// A small store covering every combination of source coverage:
///
/// - `19104`: population 1000, two observations, two properties.
/// - `19108`: population 500, one observation on a different date.
/// - `19120`: population only.
/// - `19130`: observations and properties but no population.
/// - `19140`: properties only.
#[must_use]
pub fn sample_store() -> RegionStore {
    let mut builder = RegionStoreBuilder::new();
    builder.merge_observation(vaccination_record(19104, "2021-05-28 17:20:02", 100.0, 50.0));
    builder.merge_observation(vaccination_record(19104, "2021-05-20 17:20:02", 40.0, 10.0));
    builder.merge_observation(vaccination_record(19108, "2021-05-27 17:20:02", 30.0, 20.0));
    builder.merge_observation(vaccination_record(19130, "2021-05-28 17:20:02", 5.0, 5.0));

    builder.merge_population(population_record(19104, 1000));
    builder.merge_population(population_record(19108, 500));
    builder.merge_population(population_record(19120, 250));

    builder.merge_property(&property_record(19104, "200000", "500"));
    builder.merge_property(&property_record(19104, "300001", "500"));
    builder.merge_property(&property_record(19130, "100000", "800"));
    builder.merge_property(&property_record(19140, "abc", "1200"));
    builder.finish()
}
