//! RestCountries snapshot source.
//!
//! Fetches `/v3.1/all` restricted to the fields the pipeline stores. Every
//! entry becomes one [`CountryRecord`]; missing fields take defaults instead
//! of dropping the entry.

use log::info;
use popstat_core::{CountryRecord, CountrySource, DEFAULT_NAME, DEFAULT_REGION, FetchError};
use serde::Deserialize;

use super::{
    PayloadError,
    http::{HttpFetcher, HttpSourceConfig},
};

/// Default base URL of the RestCountries service.
pub const DEFAULT_COUNTRIES_BASE_URL: &str = "https://restcountries.com";

const SNAPSHOT_PATH: &str = "v3.1/all";
const SNAPSHOT_FIELDS: &str = "name,cca2,cca3,population,region,area";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CountryPayload {
    name: Option<NamePayload>,
    cca2: Option<String>,
    cca3: Option<String>,
    region: Option<String>,
    population: Option<u64>,
    area: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NamePayload {
    common: Option<String>,
}

impl From<CountryPayload> for CountryRecord {
    fn from(payload: CountryPayload) -> Self {
        let name = payload
            .name
            .and_then(|name| name.common)
            .unwrap_or_else(|| DEFAULT_NAME.to_owned());
        let region = payload
            .region
            .unwrap_or_else(|| DEFAULT_REGION.to_owned());
        Self::new(name, region, payload.population.unwrap_or(0))
            .with_codes(
                payload.cca2.unwrap_or_default(),
                payload.cca3.unwrap_or_default(),
            )
            .with_area(payload.area.unwrap_or(0.0))
    }
}

/// Parse a RestCountries response body into records, in response order.
///
/// # Examples
/// ```
/// use popstat_data::parse_snapshot;
///
/// let body = r#"[
///     {"name": {"common": "Fiji"}, "cca2": "FJ", "cca3": "FJI",
///      "region": "Oceania", "population": 896444, "area": 18272.0},
///     {"cca3": "XXX"}
/// ]"#;
///
/// let records = parse_snapshot(body).expect("parse snapshot");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].name, "N/A");
/// assert_eq!(records[1].region, "Other");
/// ```
pub fn parse_snapshot(body: &str) -> Result<Vec<CountryRecord>, PayloadError> {
    let payloads: Vec<CountryPayload> = serde_json::from_str(body)?;
    Ok(payloads.into_iter().map(CountryRecord::from).collect())
}

/// [`CountrySource`] backed by the RestCountries HTTP API.
#[derive(Debug)]
pub struct RestCountriesSource {
    config: HttpSourceConfig,
    fetcher: HttpFetcher,
}

impl RestCountriesSource {
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

    fn snapshot_url(&self) -> String {
        self.config.endpoint(SNAPSHOT_PATH)
    }
}

impl CountrySource for RestCountriesSource {
    fn fetch_snapshot(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let url = self.snapshot_url();
        let body = self
            .fetcher
            .get_text(&url, &[("fields", SNAPSHOT_FIELDS)])?;
        let records = parse_snapshot(&body).map_err(|err| err.into_fetch_error(&url))?;
        info!(
            "event=snapshot_fetch status=ok url={url} records={}",
            records.len()
        );
        Ok(records)
    }
}
