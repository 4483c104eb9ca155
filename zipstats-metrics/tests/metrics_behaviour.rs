//! Behavioural coverage for querying regional metrics.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use zipstats_core::test_support::{
    population_record, property_record, region, vaccination_record,
};
use zipstats_core::{CalendarDate, RegionStoreBuilder, VaccinationKind};
use zipstats_metrics::{MetricsEngine, RegionRates};

/// State shared by the steps of one scenario.
#[derive(Default)]
pub struct MetricsWorld {
    builder: RegionStoreBuilder,
    engine: Option<MetricsEngine>,
    rates: Option<RegionRates>,
    answers: Vec<i64>,
}

impl MetricsWorld {
    fn engine(&mut self) -> &mut MetricsEngine {
        let builder = std::mem::take(&mut self.builder);
        self.engine
            .get_or_insert_with(|| MetricsEngine::new(builder.finish()))
    }

    fn rate(&self, id: u32) -> Option<f64> {
        let Some(rates) = &self.rates else {
            panic!("no rates were requested");
        };
        rates.get(&region(id)).copied()
    }
}

/// Scenario state.
#[fixture]
pub fn world() -> RefCell<MetricsWorld> {
    RefCell::new(MetricsWorld::default())
}

#[given("a store where 19104 has population 1000 with 100 partial and 50 full vaccinations on 2021-05-28")]
fn populated_region(world: &RefCell<MetricsWorld>) {
    let mut state = world.borrow_mut();
    state.builder.merge_population(population_record(19104, 1000));
    state.builder.merge_observation(vaccination_record(19104, "2021-05-28 17:20:02", 100.0, 50.0));
}

#[given("19108 has population 500 and no observation on 2021-05-28")]
fn region_without_matching_date(world: &RefCell<MetricsWorld>) {
    let mut state = world.borrow_mut();
    state.builder.merge_population(population_record(19108, 500));
    state.builder.merge_observation(vaccination_record(19108, "2021-05-27 17:20:02", 30.0, 20.0));
}

#[given("19130 has observations but no population")]
fn unpopulated_region(world: &RefCell<MetricsWorld>) {
    world
        .borrow_mut()
        .builder
        .merge_observation(vaccination_record(19130, "2021-05-28 17:20:02", 5.0, 5.0));
}

#[given("19104 has two properties of 500 livable area units")]
fn two_properties(world: &RefCell<MetricsWorld>) {
    let mut state = world.borrow_mut();
    state.builder.merge_property(&property_record(19104, "200000", "500"));
    state.builder.merge_property(&property_record(19104, "300000", "500"));
}

#[given("a store where 19140 has no usable market values")]
fn unusable_market_values(world: &RefCell<MetricsWorld>) {
    world
        .borrow_mut()
        .builder
        .merge_property(&property_record(19140, "abc", "1200"));
}

#[when("partial vaccination rates for 2021-05-28 are requested")]
fn request_rates(world: &RefCell<MetricsWorld>) {
    let date = CalendarDate::parse("2021-05-28")
        .unwrap_or_else(|err| panic!("valid date literal: {err}"));
    let mut state = world.borrow_mut();
    let rates = state
        .engine()
        .vaccination_rate_per_capita(&date, VaccinationKind::Partial)
        .clone();
    state.rates = Some(rates);
}

#[when("unvaccinated residents per area are requested")]
fn request_density(world: &RefCell<MetricsWorld>) {
    let mut state = world.borrow_mut();
    let rates = state.engine().unvaccinated_per_area().clone();
    state.rates = Some(rates);
}

#[when("the average market value of 19140 is requested twice")]
fn request_average_twice(world: &RefCell<MetricsWorld>) {
    let mut state = world.borrow_mut();
    let first = state.engine().average_market_value(region(19140));
    let second = state.engine().average_market_value(region(19140));
    state.answers.extend([first, second]);
}

#[then("19104 maps to 0.1")]
fn rate_for_populated(world: &RefCell<MetricsWorld>) {
    assert_eq!(world.borrow().rate(19104), Some(0.1));
}

#[then("19108 maps to 0.0")]
fn rate_for_unmatched(world: &RefCell<MetricsWorld>) {
    assert_eq!(world.borrow().rate(19108), Some(0.0));
}

#[then("19130 is absent")]
fn rate_for_unpopulated(world: &RefCell<MetricsWorld>) {
    assert_eq!(world.borrow().rate(19130), None);
}

#[then("19104 maps to 85.0")]
fn density_for_populated(world: &RefCell<MetricsWorld>) {
    assert_eq!(world.borrow().rate(19104), Some(85.0));
}

#[then("both answers are 0")]
fn zero_answers(world: &RefCell<MetricsWorld>) {
    assert_eq!(world.borrow().answers, vec![0, 0]);
}

#[then("the average was computed once")]
fn computed_once(world: &RefCell<MetricsWorld>) {
    let mut state = world.borrow_mut();
    assert_eq!(state.engine().computations(), 1);
}

#[scenario(path = "tests/features/metrics.feature", index = 0)]
fn vaccination_rates(world: RefCell<MetricsWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/metrics.feature", index = 1)]
fn unvaccinated_density(world: RefCell<MetricsWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/metrics.feature", index = 2)]
fn memoized_averages(world: RefCell<MetricsWorld>) {
    let _ = world;
}
