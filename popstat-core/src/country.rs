//! Country snapshot records.
//!
//! A snapshot is the full set of [`CountryRecord`] values obtained from one
//! ingestion run. Records are normalised before they reach storage: every
//! field has a value, so a snapshot keeps row-count parity with the upstream
//! response.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name recorded when the upstream payload has no common name.
pub const DEFAULT_NAME: &str = "N/A";

/// Region recorded when the upstream payload has no region.
pub const DEFAULT_REGION: &str = "Other";

/// Largest population, single or summed per region, that storage can hold.
pub const MAX_POPULATION: u64 = i64::MAX.unsigned_abs();

/// A single country as captured in one snapshot.
///
/// `cca3` is the key used for geographic rendering. It is expected to be
/// unique within a snapshot but nothing enforces that; duplicates are kept.
///
/// # Examples
/// ```
/// use popstat_core::CountryRecord;
///
/// let record = CountryRecord::new("Ukraine", "Europe", 37_000_000)
///     .with_codes("UA", "UKR")
///     .with_area(603_500.0);
///
/// assert_eq!(record.cca3, "UKR");
/// assert_eq!(record.population, 37_000_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CountryRecord {
    /// Common name of the country.
    pub name: String,
    /// ISO 3166-1 alpha-2 code. May be empty.
    pub cca2: String,
    /// ISO 3166-1 alpha-3 code. May be empty.
    pub cca3: String,
    /// Coarse geographic grouping. May be empty when read back from storage.
    pub region: String,
    /// Total population.
    pub population: u64,
    /// Surface area in square kilometres, zero when unknown.
    pub area: f64,
}

impl CountryRecord {
    /// Construct a record with empty codes and zero area.
    pub fn new(name: impl Into<String>, region: impl Into<String>, population: u64) -> Self {
        Self {
            name: name.into(),
            cca2: String::new(),
            cca3: String::new(),
            region: region.into(),
            population,
            area: 0.0,
        }
    }

    /// Set the two- and three-letter country codes.
    #[must_use]
    pub fn with_codes(mut self, cca2: impl Into<String>, cca3: impl Into<String>) -> Self {
        self.cca2 = cca2.into();
        self.cca3 = cca3.into();
        self
    }

    /// Set the surface area.
    #[must_use]
    pub const fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Report whether the record participates in regional aggregation.
    ///
    /// Rows with an empty region are excluded from every summary.
    #[must_use]
    pub fn has_region(&self) -> bool {
        !self.region.is_empty()
    }
}

/// A [`CountryRecord`] read back from storage with its surrogate key.
///
/// The key increases with insertion order, so sorting by `id` recovers the
/// order in which the snapshot was fetched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredCountry {
    /// Surrogate key assigned by storage.
    pub id: i64,
    /// The stored record.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: CountryRecord,
}

/// Name and code pair offered when choosing a country for history lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CountryChoice {
    /// Common name of the country.
    pub name: String,
    /// Two-letter code used by the history source.
    pub cca2: String,
}
