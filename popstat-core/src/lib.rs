//! Core domain types for the population statistics pipeline.
//!
//! The crate holds the records exchanged between ingestion, storage and
//! reporting, the traits behind which the external data sources sit, the
//! bounded retry policy used when opening storage, and an in-process
//! rendition of the regional aggregation.
//!
//! Storage adapters and HTTP sources live in `popstat-data`; this crate has no
//! I/O of its own.
#![forbid(unsafe_code)]

pub mod country;
pub mod history;
pub mod region;
pub mod retry;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use country::{
    CountryChoice, CountryRecord, DEFAULT_NAME, DEFAULT_REGION, MAX_POPULATION, StoredCountry,
};
pub use history::{HistoryPoint, HistorySeries};
pub use region::{RegionSummary, aggregate_records};
pub use retry::{Backoff, RetryExhausted, RetryPolicy, Sleeper, ThreadSleeper};
pub use source::{CountrySource, FetchError, HistorySource};
