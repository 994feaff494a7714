//! SQLite persistence for the country snapshot.
//!
//! The module is split into focused submodules:
//! - [`connector`] opens and holds the connection, with bounded retry.
//! - `schema` creates and truncates the `countries` table.
//! - `load` writes a snapshot with full-refresh semantics.
//! - `query` and `aggregate` serve the read paths.
#![forbid(unsafe_code)]

mod aggregate;
pub mod connector;
mod error;
mod load;
mod query;
mod schema;

pub use aggregate::aggregate;
pub use connector::{
    ConnectionFactory, DEFAULT_BUSY_TIMEOUT, DEFAULT_DATABASE, SqliteConnectionFactory,
    StorageConfig, StorageConnector,
};
pub use error::{ConnectionError, OpenError, StorageError};
pub use load::{LoadError, LoadReport, ReloadError, load, reload};
pub use query::{country_choices, list_countries, resolve_country_code, top_countries};
pub use schema::{SchemaError, ensure_schema, ensure_table};
