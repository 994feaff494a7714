//! Storage and data-source adapters for the population statistics pipeline.
//!
//! Responsibilities:
//! - Open and hold the single SQLite connection, with bounded retry.
//! - Maintain the `countries` table and reload it with full-refresh semantics.
//! - Run the regional aggregation and the read queries behind the CLI.
//! - Fetch the country snapshot and population histories over HTTP.
//!
//! Boundaries:
//! - Domain types and source traits live in `popstat-core`.
//! - Nothing here caches results; every read reflects the last reload.
//!
//! Invariants:
//! - No global mutable state. The [`store::StorageConnector`] is passed
//!   explicitly to every operation that needs storage.
#![forbid(unsafe_code)]

pub mod sources;
pub mod store;

pub use sources::{
    DEFAULT_COUNTRIES_BASE_URL, DEFAULT_HISTORY_BASE_URL, DEFAULT_USER_AGENT, HttpSourceConfig,
    PayloadError, RestCountriesSource, WorldBankSource, parse_history, parse_snapshot,
};
pub use store::{
    ConnectionError, ConnectionFactory, DEFAULT_BUSY_TIMEOUT, DEFAULT_DATABASE, LoadError,
    LoadReport, OpenError, ReloadError, SchemaError, SqliteConnectionFactory, StorageConfig,
    StorageConnector, StorageError, aggregate, country_choices, ensure_schema, ensure_table,
    list_countries, load, reload, resolve_country_code, top_countries,
};
