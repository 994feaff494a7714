//! Facade crate for the population statistics pipeline.
//!
//! This crate re-exports the core domain types and exposes the SQLite store
//! and HTTP data sources behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use popstat_core::{
    Backoff, CountryChoice, CountryRecord, CountrySource, FetchError, HistoryPoint,
    HistorySeries, HistorySource, RegionSummary, RetryExhausted, RetryPolicy, Sleeper,
    StoredCountry, ThreadSleeper, aggregate_records,
};

#[cfg(feature = "store-sqlite")]
pub use popstat_data::{
    ConnectionError, HttpSourceConfig, LoadError, LoadReport, ReloadError, RestCountriesSource,
    StorageConfig, StorageConnector, StorageError, WorldBankSource, aggregate, load, reload,
};

#[cfg(feature = "test-support")]
pub use popstat_core::test_support;
