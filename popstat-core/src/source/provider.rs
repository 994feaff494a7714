//! Source traits for the country snapshot and population history.

use crate::{CountryRecord, HistorySeries};

use super::error::FetchError;

/// Fetch the current country snapshot.
///
/// Implementations normalise every upstream entry into a [`CountryRecord`]
/// and must not drop entries because fields are missing.
///
/// # Examples
///
/// ```rust
/// use popstat_core::{CountryRecord, CountrySource, FetchError};
///
/// struct FixedSource;
///
/// impl CountrySource for FixedSource {
///     fn fetch_snapshot(&self) -> Result<Vec<CountryRecord>, FetchError> {
///         Ok(vec![CountryRecord::new("Iceland", "Europe", 390_000)])
///     }
/// }
///
/// let snapshot = FixedSource.fetch_snapshot()?;
/// assert_eq!(snapshot.len(), 1);
/// # Ok::<(), FetchError>(())
/// ```
pub trait CountrySource {
    /// Return every country reported by the source, in response order.
    fn fetch_snapshot(&self) -> Result<Vec<CountryRecord>, FetchError>;
}

/// Fetch the population history of one country.
pub trait HistorySource {
    /// Return the series for `country_code`, a two-letter code.
    ///
    /// `Ok(None)` means the source holds no data for the country. Points are
    /// sorted ascending by year and years without a value are omitted.
    fn fetch_history(&self, country_code: &str) -> Result<Option<HistorySeries>, FetchError>;
}
