//! Behavioural tests for in-process regional aggregation using rstest-bdd.

use std::cell::RefCell;

use popstat_core::{CountryRecord, RegionSummary, aggregate_records};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[fixture]
fn snapshot() -> RefCell<Vec<CountryRecord>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn summaries() -> RefCell<Vec<RegionSummary>> {
    RefCell::new(Vec::new())
}

fn region_x(summaries: &RefCell<Vec<RegionSummary>>) -> RegionSummary {
    summaries
        .borrow()
        .iter()
        .find(|summary| summary.region == "X")
        .cloned()
        .expect("region X should be summarised")
}

#[given("three countries in region X with populations 10, 20 and 30")]
fn three_countries(#[from(snapshot)] snapshot: &RefCell<Vec<CountryRecord>>) {
    snapshot.borrow_mut().extend([
        CountryRecord::new("Ten", "X", 10),
        CountryRecord::new("Twenty", "X", 20),
        CountryRecord::new("Thirty", "X", 30),
    ]);
}

#[given("a country without a region")]
fn unplaced_country(#[from(snapshot)] snapshot: &RefCell<Vec<CountryRecord>>) {
    snapshot
        .borrow_mut()
        .push(CountryRecord::new("Unplaced", "", 1_000));
}

#[given("two countries in region X with equal populations")]
fn tied_countries(#[from(snapshot)] snapshot: &RefCell<Vec<CountryRecord>>) {
    snapshot.borrow_mut().extend([
        CountryRecord::new("Earlier", "X", 500),
        CountryRecord::new("Later", "X", 500),
    ]);
}

#[when("I summarise the snapshot by region")]
fn summarise(
    #[from(snapshot)] snapshot: &RefCell<Vec<CountryRecord>>,
    #[from(summaries)] summaries: &RefCell<Vec<RegionSummary>>,
) {
    *summaries.borrow_mut() = aggregate_records(&snapshot.borrow());
}

#[then("region X has a total population of 60")]
fn total_is_sixty(#[from(summaries)] summaries: &RefCell<Vec<RegionSummary>>) {
    assert_eq!(region_x(summaries).total_population, 60);
}

#[then("the largest country in region X has population 30")]
fn largest_is_thirty(#[from(summaries)] summaries: &RefCell<Vec<RegionSummary>>) {
    let summary = region_x(summaries);
    assert_eq!(summary.largest_country, "Thirty");
    assert_eq!(summary.largest_population, 30);
}

#[then("the smallest country in region X has population 10")]
fn smallest_is_ten(#[from(summaries)] summaries: &RefCell<Vec<RegionSummary>>) {
    let summary = region_x(summaries);
    assert_eq!(summary.smallest_country, "Ten");
    assert_eq!(summary.smallest_population, 10);
}

#[then("only region X is reported")]
fn only_region_x(#[from(summaries)] summaries: &RefCell<Vec<RegionSummary>>) {
    let regions: Vec<String> = summaries
        .borrow()
        .iter()
        .map(|summary| summary.region.clone())
        .collect();
    assert_eq!(regions, vec!["X".to_owned()]);
}

#[then("the first fetched country is both largest and smallest")]
fn first_wins_ties(#[from(summaries)] summaries: &RefCell<Vec<RegionSummary>>) {
    let summary = region_x(summaries);
    assert_eq!(summary.largest_country, "Earlier");
    assert_eq!(summary.smallest_country, "Earlier");
}

#[scenario(path = "tests/features/region_aggregation.feature", index = 0)]
fn summarising_single_region(
    snapshot: RefCell<Vec<CountryRecord>>,
    summaries: RefCell<Vec<RegionSummary>>,
) {
    let _ = (snapshot, summaries);
}

#[scenario(path = "tests/features/region_aggregation.feature", index = 1)]
fn excluding_unplaced_countries(
    snapshot: RefCell<Vec<CountryRecord>>,
    summaries: RefCell<Vec<RegionSummary>>,
) {
    let _ = (snapshot, summaries);
}

#[scenario(path = "tests/features/region_aggregation.feature", index = 2)]
fn resolving_ties(snapshot: RefCell<Vec<CountryRecord>>, summaries: RefCell<Vec<RegionSummary>>) {
    let _ = (snapshot, summaries);
}
