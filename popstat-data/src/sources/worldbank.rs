//! World Bank population history source.
//!
//! Queries the `SP.POP.TOTL` indicator for 1990 to 2023. The response is a
//! two-element array of paging metadata followed by the data rows; a response
//! without the second element means the service has nothing for the country.

use log::info;
use popstat_core::{FetchError, HistoryPoint, HistorySeries, HistorySource};
use serde::Deserialize;
use serde_json::Value;

use super::{
    PayloadError,
    http::{HttpFetcher, HttpSourceConfig},
};

/// Default base URL of the World Bank API.
pub const DEFAULT_HISTORY_BASE_URL: &str = "https://api.worldbank.org";

const INDICATOR: &str = "SP.POP.TOTL";
const DATE_RANGE: &str = "1990:2023";
const PER_PAGE: &str = "50";

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    #[serde(default)]
    value: Option<u64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    country: Option<CountryRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CountryRef {
    value: Option<String>,
}

/// Parse a World Bank indicator response into a series sorted by year.
///
/// Returns `Ok(None)` when the second array element is absent or not an
/// array, or when every entry has a null value.
///
/// # Examples
/// ```
/// use popstat_data::parse_history;
///
/// let body = r#"[
///     {"page": 1, "pages": 1},
///     [
///         {"country": {"value": "Kenya"}, "date": "2001", "value": 32000000},
///         {"country": {"value": "Kenya"}, "date": "2000", "value": 31000000},
///         {"country": {"value": "Kenya"}, "date": "1999", "value": null}
///     ]
/// ]"#;
///
/// let series = parse_history(body).expect("parse").expect("series present");
/// let years: Vec<i32> = series.iter().map(|point| point.year).collect();
/// assert_eq!(years, [2000, 2001]);
///
/// assert_eq!(parse_history(r#"[{"message": []}]"#).expect("parse"), None);
/// ```
pub fn parse_history(body: &str) -> Result<Option<HistorySeries>, PayloadError> {
    let document: Value = serde_json::from_str(body)?;
    let Some(rows) = document.get(1).filter(|rows| rows.is_array()) else {
        return Ok(None);
    };
    let entries: Vec<HistoryEntry> = serde_json::from_value(rows.clone())?;

    let mut series = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Some(population) = entry.value else {
            continue;
        };
        let date = entry.date.unwrap_or_default();
        let year = date
            .trim()
            .parse::<i32>()
            .map_err(|_| PayloadError::Year {
                index,
                date: date.clone(),
            })?;
        series.push(HistoryPoint {
            country_label: entry
                .country
                .and_then(|country| country.value)
                .unwrap_or_default(),
            year,
            population,
        });
    }

    if series.is_empty() {
        return Ok(None);
    }
    series.sort_by_key(|point| point.year);
    Ok(Some(series))
}

/// [`HistorySource`] backed by the World Bank indicators API.
#[derive(Debug)]
pub struct WorldBankSource {
    config: HttpSourceConfig,
    fetcher: HttpFetcher,
}

impl WorldBankSource {
    /// Create a source for the given base URL with default settings.
    ///
    /// # Errors
    /// Returns [`FetchError::Client`] if the HTTP client or runtime fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_config(HttpSourceConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    /// Returns [`FetchError::Client`] if the HTTP client or runtime fails to
    /// build.
    pub fn with_config(config: HttpSourceConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    fn history_url(&self, country_code: &str) -> String {
        self.config
            .endpoint(&format!("v2/country/{country_code}/indicator/{INDICATOR}"))
    }
}

fn validate_code(country_code: &str) -> Result<(), FetchError> {
    if country_code.is_empty() {
        return Err(FetchError::InvalidRequest {
            message: "country code must not be empty".to_owned(),
        });
    }
    if !country_code.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(FetchError::InvalidRequest {
            message: format!("country code '{country_code}' must be ASCII alphanumeric"),
        });
    }
    Ok(())
}

impl HistorySource for WorldBankSource {
    fn fetch_history(&self, country_code: &str) -> Result<Option<HistorySeries>, FetchError> {
        validate_code(country_code)?;
        let url = self.history_url(country_code);
        let body = self.fetcher.get_text(
            &url,
            &[
                ("format", "json"),
                ("date", DATE_RANGE),
                ("per_page", PER_PAGE),
            ],
        )?;
        let series = parse_history(&body).map_err(|err| err.into_fetch_error(&url))?;
        info!(
            "event=history_fetch status=ok code={country_code} points={}",
            series.as_ref().map_or(0, Vec::len)
        );
        Ok(series)
    }
}
