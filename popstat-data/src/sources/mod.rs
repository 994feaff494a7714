//! HTTP implementations of the source traits.
//!
//! [`RestCountriesSource`] supplies the country snapshot and
//! [`WorldBankSource`] supplies population histories. Both block on async
//! `reqwest` calls internally and are attempted once per request.
//!
//! The body parsers [`parse_snapshot`] and [`parse_history`] are public so
//! payloads can be decoded without a network round trip.
//!
//! # Example
//!
//! ```no_run
//! use popstat_core::{CountrySource, HistorySource};
//! use popstat_data::{HttpSourceConfig, RestCountriesSource, WorldBankSource};
//! use std::time::Duration;
//!
//! let countries = RestCountriesSource::with_config(
//!     HttpSourceConfig::new("https://restcountries.com").with_timeout(Duration::from_secs(30)),
//! )?;
//! let snapshot = countries.fetch_snapshot()?;
//!
//! let history = WorldBankSource::new("https://api.worldbank.org")?;
//! if let Some(series) = history.fetch_history("UA")? {
//!     println!("{} points for {}", series.len(), snapshot.len());
//! }
//! # Ok::<(), popstat_core::FetchError>(())
//! ```

mod http;
mod restcountries;
mod worldbank;

use popstat_core::FetchError;
use thiserror::Error;

pub use http::{DEFAULT_USER_AGENT, HttpSourceConfig};
pub use restcountries::{DEFAULT_COUNTRIES_BASE_URL, RestCountriesSource, parse_snapshot};
pub use worldbank::{DEFAULT_HISTORY_BASE_URL, WorldBankSource, parse_history};

/// A response body did not have the expected shape.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The body is not JSON of the expected shape.
    #[error("invalid JSON payload")]
    Json(#[from] serde_json::Error),
    /// A history entry with a value has a missing or non-numeric year.
    #[error("entry {index} has non-numeric year '{date}'")]
    Year {
        /// Position of the entry in the data array.
        index: usize,
        /// Raw `date` field, empty when absent.
        date: String,
    },
}

impl PayloadError {
    pub(crate) fn into_fetch_error(self, url: &str) -> FetchError {
        let message = match &self {
            Self::Json(source) => format!("{self}: {source}"),
            Self::Year { .. } => self.to_string(),
        };
        FetchError::Parse {
            url: url.to_owned(),
            message,
        }
    }
}
