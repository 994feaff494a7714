//! `history` command: print the population series of one country.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::{error, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use popstat_data::{
    DEFAULT_HISTORY_BASE_URL, HttpSourceConfig, StorageConnector, resolve_country_code,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CONNECT_ATTEMPTS, ARG_CONNECT_DELAY_SECS, ARG_COUNTRY, ARG_DATABASE,
    ARG_HISTORY_BASE_URL, ARG_TIMEOUT_SECS, CliError, ENV_HISTORY_COUNTRY,
    output::{write_json, write_line},
    sources::{SourceBuilder, http_config},
    storage::StorageSettings,
};

/// CLI arguments for the `history` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "history",
    long_about = "Fetch the 1990-2023 population series for one country from \
                 the World Bank. The country may be given as a stored name \
                 or as its two-letter code.",
    about = "Show the population history of a country"
)]
#[ortho_config(prefix = "POPSTAT")]
pub(crate) struct HistoryArgs {
    /// Country name as stored by `reload`, or a two-letter code.
    #[arg(value_name = "country")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Path to the SQLite database file.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Attempts made to open the database before giving up.
    #[arg(long = ARG_CONNECT_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) connect_attempts: Option<u32>,
    /// Seconds to wait between connection attempts.
    #[arg(long = ARG_CONNECT_DELAY_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) connect_delay_secs: Option<u64>,
    /// Base URL of the World Bank API.
    #[arg(long = ARG_HISTORY_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) history_base_url: Option<String>,
    /// Whole-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl HistoryArgs {
    pub(crate) fn into_config(self) -> Result<HistoryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        HistoryConfig::try_from(merged)
    }
}

/// Resolved `history` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryConfig {
    pub(crate) country: String,
    pub(crate) storage: StorageSettings,
    pub(crate) source: HttpSourceConfig,
}

impl TryFrom<HistoryArgs> for HistoryConfig {
    type Error = CliError;

    fn try_from(args: HistoryArgs) -> Result<Self, Self::Error> {
        let country = args
            .country
            .map(|country| country.trim().to_owned())
            .filter(|country| !country.is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_COUNTRY,
                env: ENV_HISTORY_COUNTRY,
            })?;
        let base_url = args
            .history_base_url
            .unwrap_or_else(|| DEFAULT_HISTORY_BASE_URL.to_owned());
        Ok(Self {
            country,
            storage: StorageSettings::resolve(
                args.database,
                args.connect_attempts,
                args.connect_delay_secs,
            ),
            source: http_config(base_url, args.timeout_secs),
        })
    }
}

/// Map a stored country name, or a bare code, to the code sent upstream.
pub(crate) fn resolve_code(
    connector: &StorageConnector,
    country: &str,
) -> Result<String, CliError> {
    if let Some(code) = resolve_country_code(connector, country)? {
        return Ok(code);
    }
    if looks_like_code(country) {
        return Ok(country.to_ascii_uppercase());
    }
    Err(CliError::CountryNotFound {
        country: country.to_owned(),
    })
}

fn looks_like_code(value: &str) -> bool {
    (2..=3).contains(&value.len()) && value.chars().all(|ch| ch.is_ascii_alphanumeric())
}

/// Fetch and print the history of the configured country.
///
/// A bare two- or three-character code is sent as-is without opening the
/// database; anything else is looked up among the stored names first.
pub(crate) fn run_history_with(
    config: &HistoryConfig,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let code = if looks_like_code(&config.country) {
        config.country.to_ascii_uppercase()
    } else {
        let connector = config.storage.connect()?;
        resolve_code(&connector, &config.country)?
    };
    let source = builder.history(config.source.clone())?;

    match source.fetch_history(&code) {
        Ok(Some(series)) => write_json(writer, &series),
        Ok(None) => {
            warn!("event=cli_history status=no_data code={code}");
            write_line(writer, &format!("no data available for {code}"))
        }
        Err(err) => {
            error!("event=cli_history status=fetch_failed code={code} error={err}");
            write_line(writer, &format!("no data available for {code}"))
        }
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<HistoryConfig, CliError> {
    let merged = HistoryArgs::merge_from_layers(layers).map_err(CliError::from)?;
    HistoryConfig::try_from(merged)
}
