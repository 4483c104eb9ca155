//! Load-phase and query-phase region stores.
//!
//! Loading happens through a [`RegionStoreBuilder`], which owns the regions
//! mutably while each source is merged in turn. [`RegionStoreBuilder::finish`]
//! freezes the result into a [`RegionStore`] that only offers read access, so
//! the query phase cannot mutate what the load phase produced.

use std::collections::BTreeMap;

use crate::record::{ObservationRecord, PopulationRecord, PropertyRecord};
use crate::region::{PropertyMeasure, Region, RegionId};

/// Outcome of merging one property record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyMerge {
    /// A market value sample was appended.
    pub market_value: bool,
    /// A livable area sample was appended.
    pub livable_area: bool,
}

/// Mutable store used while sources are being merged.
///
/// Regions are created lazily by whichever source first references an
/// identifier. Within one source, later records overwrite earlier ones that
/// share an observation timestamp or population entry.
///
/// # Examples
///
/// ```
/// use zipstats_core::{PopulationRecord, RegionId, RegionStoreBuilder};
///
/// # fn main() -> Result<(), zipstats_core::RegionIdError> {
/// let region = RegionId::parse_exact("19108")?;
/// let mut builder = RegionStoreBuilder::new();
/// builder.merge_population(PopulationRecord { region, population: 500 });
///
/// let store = builder.finish();
/// assert_eq!(store.get(region).map(|r| r.population()), Some(500));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegionStoreBuilder {
    regions: BTreeMap<RegionId, Region>,
}

impl RegionStoreBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the observation at the record's timestamp.
    ///
    /// Returns `true` when an existing entry with the same timestamp was
    /// replaced.
    pub fn merge_observation(&mut self, record: ObservationRecord) -> bool {
        self.region_mut(record.region)
            .record_observation(record.timestamp, record.observation)
            .is_some()
    }

    /// Set the region's population, replacing any earlier value.
    pub fn merge_population(&mut self, record: PopulationRecord) {
        self.region_mut(record.region)
            .set_population(record.population);
    }

    /// Append whichever property samples parse as numbers.
    ///
    /// The region is created even when neither sample is usable.
    pub fn merge_property(&mut self, record: &PropertyRecord) -> PropertyMerge {
        let market_value = record.market_value_sample();
        let livable_area = record.livable_area_sample();
        let region = self.region_mut(record.region);
        if let Some(sample) = market_value {
            region.push_sample(PropertyMeasure::MarketValue, sample);
        }
        if let Some(sample) = livable_area {
            region.push_sample(PropertyMeasure::LivableArea, sample);
        }
        PropertyMerge {
            market_value: market_value.is_some(),
            livable_area: livable_area.is_some(),
        }
    }

    /// Look up a region merged so far.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Number of regions merged so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Report whether no region has been merged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Freeze the builder into a read-only store.
    #[must_use]
    pub fn finish(self) -> RegionStore {
        RegionStore {
            regions: self.regions,
        }
    }

    fn region_mut(&mut self, id: RegionId) -> &mut Region {
        self.regions.entry(id).or_insert_with(|| Region::new(id))
    }
}

/// Read-only regions keyed by identifier, iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionStore {
    regions: BTreeMap<RegionId, Region>,
}

impl RegionStore {
    /// Look up a region.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Iterate over all regions in ascending identifier order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.values()
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Report whether the store holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
