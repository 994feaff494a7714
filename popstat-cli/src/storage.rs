//! Storage options shared by every subcommand.

use std::time::Duration;

use camino::Utf8PathBuf;
use popstat_core::{Backoff, RetryPolicy, Sleeper, ThreadSleeper};
use popstat_core::retry::{DEFAULT_DELAY, DEFAULT_MAX_ATTEMPTS};
use popstat_data::{
    DEFAULT_DATABASE, SqliteConnectionFactory, StorageConfig, StorageConnector,
};

use crate::CliError;

/// Resolved storage location and connection retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StorageSettings {
    pub(crate) database: Utf8PathBuf,
    pub(crate) policy: RetryPolicy,
}

impl StorageSettings {
    /// Apply defaults to the merged storage options.
    pub(crate) fn resolve(
        database: Option<Utf8PathBuf>,
        connect_attempts: Option<u32>,
        connect_delay_secs: Option<u64>,
    ) -> Self {
        let delay = connect_delay_secs.map_or(DEFAULT_DELAY, Duration::from_secs);
        Self {
            database: database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            policy: RetryPolicy::new(
                connect_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
                Backoff::Fixed(delay),
            ),
        }
    }

    pub(crate) fn connect(&self) -> Result<StorageConnector, CliError> {
        self.connect_with(&ThreadSleeper)
    }

    pub(crate) fn connect_with(&self, sleeper: &dyn Sleeper) -> Result<StorageConnector, CliError> {
        let factory = SqliteConnectionFactory::new(&StorageConfig::new(self.database.clone()));
        Ok(StorageConnector::connect(&factory, &self.policy, sleeper)?)
    }
}
