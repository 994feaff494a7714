//! External data sources feeding the pipeline.
//!
//! [`CountrySource`] supplies the current country snapshot and
//! [`HistorySource`] supplies per-country population series. Both are
//! synchronous so the pipeline stays embeddable in blocking callers; HTTP
//! implementations live in `popstat-data`.
//!
//! Sources are called once per request. A failure is returned as a
//! [`FetchError`] and never retried.

mod error;
mod provider;

pub use error::FetchError;
pub use provider::{CountrySource, HistorySource};
