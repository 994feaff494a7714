//! `reload` command: fetch the country snapshot and replace the stored one.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use popstat_data::{DEFAULT_COUNTRIES_BASE_URL, HttpSourceConfig, reload};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CONNECT_ATTEMPTS, ARG_CONNECT_DELAY_SECS, ARG_COUNTRIES_BASE_URL, ARG_DATABASE,
    ARG_TIMEOUT_SECS, CliError,
    output::write_json,
    sources::{SourceBuilder, http_config},
    storage::StorageSettings,
};

/// CLI arguments for the `reload` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "reload",
    long_about = "Fetch every country from the RestCountries service and \
                 replace the stored snapshot in one transaction. An empty \
                 response leaves the previous snapshot in place.",
    about = "Reload the country snapshot"
)]
#[ortho_config(prefix = "POPSTAT")]
pub(crate) struct ReloadArgs {
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
    /// Base URL of the RestCountries service.
    #[arg(long = ARG_COUNTRIES_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) countries_base_url: Option<String>,
    /// Whole-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ReloadArgs {
    pub(crate) fn into_config(self) -> Result<ReloadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ReloadConfig::from(merged))
    }
}

/// Resolved `reload` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReloadConfig {
    pub(crate) storage: StorageSettings,
    pub(crate) source: HttpSourceConfig,
}

impl From<ReloadArgs> for ReloadConfig {
    fn from(args: ReloadArgs) -> Self {
        let base_url = args
            .countries_base_url
            .unwrap_or_else(|| DEFAULT_COUNTRIES_BASE_URL.to_owned());
        Self {
            storage: StorageSettings::resolve(
                args.database,
                args.connect_attempts,
                args.connect_delay_secs,
            ),
            source: http_config(base_url, args.timeout_secs),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReloadSummary<'a> {
    database: &'a str,
    inserted: usize,
}

pub(crate) fn run_reload_with(
    config: &ReloadConfig,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let source = builder.countries(config.source.clone())?;
    let mut connector = config.storage.connect()?;
    let report = reload(source.as_ref(), &mut connector)?;
    info!(
        "event=cli_reload status=ok database={} inserted={}",
        config.storage.database, report.inserted
    );
    write_json(
        writer,
        &ReloadSummary {
            database: config.storage.database.as_str(),
            inserted: report.inserted,
        },
    )
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReloadConfig, CliError> {
    let merged = ReloadArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(ReloadConfig::from(merged))
}
