//! Error types emitted by the popstat CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use popstat_core::FetchError;
use popstat_data::{ConnectionError, ReloadError, StorageError};
use thiserror::Error;

/// Errors emitted by the popstat CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The requested log level is not recognised.
    #[error("unsupported log level `{level}`; expected trace|debug|info|warn|error|off")]
    InvalidLogLevel { level: String },
    /// The logging backend could not start.
    #[error("failed to start logger: {0}")]
    StartLogger(#[source] flexi_logger::FlexiLoggerError),
    /// The store stayed unreachable after every connection attempt.
    #[error(transparent)]
    Connect(#[from] ConnectionError),
    /// A read against the store failed.
    #[error("storage query failed: {0}")]
    Storage(#[from] StorageError),
    /// Reloading the snapshot failed.
    #[error("reload failed: {0}")]
    Reload(#[source] Box<ReloadError>),
    /// Constructing an HTTP source failed.
    #[error("failed to build data source for {base_url:?}: {source}")]
    BuildSource {
        base_url: String,
        #[source]
        source: FetchError,
    },
    /// The history lookup named a country that is not stored.
    #[error("unknown country {country:?}; reload the snapshot or pass a two-letter code")]
    CountryNotFound { country: String },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<ReloadError> for CliError {
    fn from(err: ReloadError) -> Self {
        Self::Reload(Box::new(err))
    }
}
