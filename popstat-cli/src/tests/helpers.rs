//! Test helpers: stub source builder and a throwaway database.

use super::*;
use crate::storage::StorageSettings;
use camino::Utf8PathBuf;
use popstat_core::{
    Backoff, CountryRecord, CountrySource, FetchError, HistorySeries, HistorySource, RetryPolicy,
    test_support::{StubCountrySource, StubHistorySource},
};
use popstat_data::HttpSourceConfig;
use std::{cell::RefCell, time::Duration};
use tempfile::TempDir;

/// [`SourceBuilder`] handing out stub sources and recording the requested
/// base URLs.
pub(super) struct StubSourceBuilder {
    countries: Result<Vec<CountryRecord>, FetchError>,
    history: Result<Option<HistorySeries>, FetchError>,
    requested: RefCell<Vec<String>>,
}

impl StubSourceBuilder {
    pub(super) fn with_countries(records: Vec<CountryRecord>) -> Self {
        Self {
            countries: Ok(records),
            history: Ok(None),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn with_country_error(error: FetchError) -> Self {
        Self {
            countries: Err(error),
            history: Ok(None),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn with_history(history: Result<Option<HistorySeries>, FetchError>) -> Self {
        Self {
            countries: Ok(Vec::new()),
            history,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl SourceBuilder for StubSourceBuilder {
    fn countries(&self, config: HttpSourceConfig) -> Result<Box<dyn CountrySource>, CliError> {
        self.requested.borrow_mut().push(config.base_url);
        let source = match &self.countries {
            Ok(records) => StubCountrySource::with_records(records.clone()),
            Err(err) => StubCountrySource::with_error(err.clone()),
        };
        Ok(Box::new(source))
    }

    fn history(&self, config: HttpSourceConfig) -> Result<Box<dyn HistorySource>, CliError> {
        self.requested.borrow_mut().push(config.base_url);
        let source = match &self.history {
            Ok(Some(series)) => StubHistorySource::with_series(series.clone()),
            Ok(None) => StubHistorySource::with_no_data(),
            Err(err) => StubHistorySource::with_error(err.clone()),
        };
        Ok(Box::new(source))
    }
}

/// A database path inside a temporary directory.
pub(super) struct Workspace {
    _dir: TempDir,
    database: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            database: root.join("data/population.db"),
            _dir: dir,
        }
    }

    pub(super) fn database(&self) -> &Utf8PathBuf {
        &self.database
    }

    /// Storage settings that try once and never sleep.
    pub(super) fn storage(&self) -> StorageSettings {
        StorageSettings {
            database: self.database.clone(),
            policy: RetryPolicy::new(1, Backoff::Fixed(Duration::ZERO)),
        }
    }
}

pub(super) fn sample_countries() -> Vec<CountryRecord> {
    vec![
        CountryRecord::new("Kenya", "Africa", 55_000_000).with_codes("KE", "KEN"),
        CountryRecord::new("Ghana", "Africa", 34_000_000).with_codes("GH", "GHA"),
        CountryRecord::new("Japan", "Asia", 124_000_000).with_codes("JP", "JPN"),
    ]
}

pub(super) fn written(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("output is UTF-8")
}
