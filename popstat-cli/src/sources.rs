//! Construction of the HTTP data sources used by `reload` and `history`.

use std::time::Duration;

use popstat_core::{CountrySource, HistorySource};
use popstat_data::{HttpSourceConfig, RestCountriesSource, WorldBankSource};

use crate::CliError;

/// Builds the data sources for the current invocation.
pub(crate) trait SourceBuilder {
    fn countries(&self, config: HttpSourceConfig) -> Result<Box<dyn CountrySource>, CliError>;
    fn history(&self, config: HttpSourceConfig) -> Result<Box<dyn HistorySource>, CliError>;
}

pub(crate) struct DefaultSourceBuilder;

impl SourceBuilder for DefaultSourceBuilder {
    fn countries(&self, config: HttpSourceConfig) -> Result<Box<dyn CountrySource>, CliError> {
        let base_url = config.base_url.clone();
        let source = RestCountriesSource::with_config(config)
            .map_err(|source| CliError::BuildSource { base_url, source })?;
        Ok(Box::new(source))
    }

    fn history(&self, config: HttpSourceConfig) -> Result<Box<dyn HistorySource>, CliError> {
        let base_url = config.base_url.clone();
        let source = WorldBankSource::with_config(config)
            .map_err(|source| CliError::BuildSource { base_url, source })?;
        Ok(Box::new(source))
    }
}

/// HTTP settings for a source, with an optional whole-request timeout.
pub(crate) fn http_config(base_url: String, timeout_secs: Option<u64>) -> HttpSourceConfig {
    let config = HttpSourceConfig::new(base_url);
    match timeout_secs {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    }
}
