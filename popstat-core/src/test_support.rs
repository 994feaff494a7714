//! Test doubles for the source traits and the retry clock.
//!
//! The stubs return pre-configured responses without touching the network,
//! and [`RecordingSleeper`] records requested delays instead of waiting.

use std::{sync::Mutex, time::Duration};

use crate::{
    CountryRecord, CountrySource, FetchError, HistoryPoint, HistorySeries, HistorySource, Sleeper,
};

/// [`Sleeper`] that records every requested delay and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Delays requested so far, in order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

/// Stub [`CountrySource`] returning a fixed snapshot or error.
#[derive(Debug, Clone)]
pub struct StubCountrySource {
    response: Result<Vec<CountryRecord>, FetchError>,
}

impl StubCountrySource {
    /// Create a source returning `records`.
    #[must_use]
    pub const fn with_records(records: Vec<CountryRecord>) -> Self {
        Self {
            response: Ok(records),
        }
    }

    /// Create a source failing with `error`.
    #[must_use]
    pub const fn with_error(error: FetchError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

impl CountrySource for StubCountrySource {
    fn fetch_snapshot(&self) -> Result<Vec<CountryRecord>, FetchError> {
        self.response.clone()
    }
}

/// Stub [`HistorySource`] returning a fixed series, no data, or an error.
///
/// Requested country codes are recorded for later assertions.
#[derive(Debug)]
pub struct StubHistorySource {
    response: Result<Option<HistorySeries>, FetchError>,
    requests: Mutex<Vec<String>>,
}

impl StubHistorySource {
    /// Create a source returning `series` for every code.
    #[must_use]
    pub const fn with_series(series: HistorySeries) -> Self {
        Self::with_response(Ok(Some(series)))
    }

    /// Create a source reporting that no data exists.
    #[must_use]
    pub const fn with_no_data() -> Self {
        Self::with_response(Ok(None))
    }

    /// Create a source failing with `error`.
    #[must_use]
    pub const fn with_error(error: FetchError) -> Self {
        Self::with_response(Err(error))
    }

    const fn with_response(response: Result<Option<HistorySeries>, FetchError>) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Codes requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl HistorySource for StubHistorySource {
    fn fetch_history(&self, country_code: &str) -> Result<Option<HistorySeries>, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(country_code.to_owned());
        }
        self.response.clone()
    }
}

/// Build a history point for tests.
#[must_use]
pub fn point(country_label: &str, year: i32, population: u64) -> HistoryPoint {
    HistoryPoint {
        country_label: country_label.to_owned(),
        year,
        population,
    }
}
