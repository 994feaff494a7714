//! Historical population series for a single country.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One observation in a population series.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryPoint {
    /// Country label as reported by the history source.
    pub country_label: String,
    /// Calendar year of the observation.
    pub year: i32,
    /// Total population in that year.
    pub population: u64,
}

/// Points ordered ascending by year.
///
/// Produced fresh for every request and never persisted.
pub type HistorySeries = Vec<HistoryPoint>;
