//! Property-based tests for in-process regional aggregation.
//!
//! # Invariants tested
//!
//! - **Totals:** each region's total equals the sum of its members.
//! - **Extremes:** largest/smallest match the first max/min row in fetch order.
//! - **Exclusion:** rows with an empty region never produce a summary.
//! - **Ordering:** summaries are sorted by total, largest first.

use std::collections::BTreeMap;

use popstat_core::{CountryRecord, aggregate_records};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = CountryRecord> {
    (
        prop::sample::select(vec!["", "Africa", "Americas", "Asia", "Europe"]),
        0_u64..1_000,
    )
        .prop_map(|(region, population)| CountryRecord::new("", region, population))
}

fn snapshot_strategy() -> impl Strategy<Value = Vec<CountryRecord>> {
    prop::collection::vec(record_strategy(), 0..40).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(index, mut record)| {
                record.name = format!("country-{index}");
                record
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn totals_match_member_sums(records in snapshot_strategy()) {
        let mut expected: BTreeMap<&str, u64> = BTreeMap::new();
        for record in records.iter().filter(|record| !record.region.is_empty()) {
            *expected.entry(record.region.as_str()).or_default() += record.population;
        }

        let summaries = aggregate_records(&records);

        prop_assert_eq!(summaries.len(), expected.len());
        for summary in &summaries {
            prop_assert!(!summary.region.is_empty());
            prop_assert_eq!(Some(&summary.total_population), expected.get(summary.region.as_str()));
        }
    }

    #[test]
    fn extremes_are_first_max_and_min(records in snapshot_strategy()) {
        for summary in aggregate_records(&records) {
            let members: Vec<&CountryRecord> = records
                .iter()
                .filter(|record| record.region == summary.region)
                .collect();
            let max = members.iter().map(|record| record.population).max();
            let min = members.iter().map(|record| record.population).min();
            let first_max = members.iter().find(|record| Some(record.population) == max);
            let first_min = members.iter().find(|record| Some(record.population) == min);

            prop_assert_eq!(first_max.map(|record| record.name.as_str()), Some(summary.largest_country.as_str()));
            prop_assert_eq!(first_min.map(|record| record.name.as_str()), Some(summary.smallest_country.as_str()));
        }
    }

    #[test]
    fn summaries_are_sorted_by_total(records in snapshot_strategy()) {
        let totals: Vec<u64> = aggregate_records(&records)
            .iter()
            .map(|summary| summary.total_population)
            .collect();
        prop_assert!(totals.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
