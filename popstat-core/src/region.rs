//! Per-region summary statistics.
//!
//! [`RegionSummary`] values are derived from the current snapshot on demand
//! and never persisted. Storage backends compute them with a windowed ranking
//! query; [`aggregate_records`] performs the same computation in process.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{CountryRecord, MAX_POPULATION};

/// Aggregated statistics for one region.
///
/// Extremes are resolved by population; ties go to the row that appeared
/// first in fetch order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionSummary {
    /// Region name. Never empty.
    pub region: String,
    /// Sum of population over every country in the region.
    pub total_population: u64,
    /// Name of the most populous country.
    pub largest_country: String,
    /// Population of the most populous country.
    pub largest_population: u64,
    /// Name of the least populous country.
    pub smallest_country: String,
    /// Population of the least populous country.
    pub smallest_population: u64,
}

#[derive(Debug)]
struct RegionAccumulator<'a> {
    region: &'a str,
    total: u64,
    largest: &'a CountryRecord,
    smallest: &'a CountryRecord,
}

impl<'a> RegionAccumulator<'a> {
    fn new(record: &'a CountryRecord) -> Self {
        Self {
            region: record.region.as_str(),
            total: record.population.min(MAX_POPULATION),
            largest: record,
            smallest: record,
        }
    }

    fn push(&mut self, record: &'a CountryRecord) {
        self.total = self
            .total
            .saturating_add(record.population)
            .min(MAX_POPULATION);
        // Strict comparisons keep the earliest row on ties.
        if record.population > self.largest.population {
            self.largest = record;
        }
        if record.population < self.smallest.population {
            self.smallest = record;
        }
    }

    fn finish(self) -> RegionSummary {
        RegionSummary {
            region: self.region.to_owned(),
            total_population: self.total,
            largest_country: self.largest.name.clone(),
            largest_population: self.largest.population,
            smallest_country: self.smallest.name.clone(),
            smallest_population: self.smallest.population,
        }
    }
}

/// Summarise records by region without a relational engine.
///
/// Records are taken in fetch order. Rows with an empty region are skipped,
/// the rest are grouped by region, scanned once for the extremes and summed.
/// The result is ordered by total population, largest first; regions with
/// equal totals keep their order of first appearance.
///
/// Totals are capped at [`MAX_POPULATION`]. Storage refuses snapshots whose
/// regional totals exceed it, so the cap never applies to stored data.
///
/// # Examples
/// ```
/// use popstat_core::{CountryRecord, aggregate_records};
///
/// let records = vec![
///     CountryRecord::new("A", "X", 10),
///     CountryRecord::new("B", "X", 30),
///     CountryRecord::new("C", "X", 20),
///     CountryRecord::new("Unplaced", "", 99),
/// ];
/// let summaries = aggregate_records(&records);
///
/// assert_eq!(summaries.len(), 1);
/// assert_eq!(summaries[0].total_population, 60);
/// assert_eq!(summaries[0].largest_country, "B");
/// assert_eq!(summaries[0].smallest_country, "A");
/// ```
#[must_use]
pub fn aggregate_records(records: &[CountryRecord]) -> Vec<RegionSummary> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut accumulators: Vec<RegionAccumulator<'_>> = Vec::new();

    for record in records.iter().filter(|record| record.has_region()) {
        match positions.get(record.region.as_str()) {
            Some(&position) => {
                if let Some(accumulator) = accumulators.get_mut(position) {
                    accumulator.push(record);
                }
            }
            None => {
                positions.insert(record.region.as_str(), accumulators.len());
                accumulators.push(RegionAccumulator::new(record));
            }
        }
    }

    let mut summaries: Vec<RegionSummary> = accumulators
        .into_iter()
        .map(RegionAccumulator::finish)
        .collect();
    summaries.sort_by(|left, right| right.total_population.cmp(&left.total_population));
    summaries
}
