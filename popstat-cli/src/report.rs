//! Read-only report commands: `countries`, `regions` and `top`.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use popstat_data::{aggregate, country_choices, list_countries, top_countries};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CHOICES, ARG_CONNECT_ATTEMPTS, ARG_CONNECT_DELAY_SECS, ARG_DATABASE, ARG_LIMIT, CliError,
    output::write_json, storage::StorageSettings,
};

/// Number of rows listed by `top` when no limit is configured.
pub(crate) const DEFAULT_TOP_LIMIT: usize = 10;

/// CLI arguments for the `countries` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "countries",
    about = "List the stored countries in fetch order"
)]
#[ortho_config(prefix = "POPSTAT")]
pub(crate) struct CountriesArgs {
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
    /// List name and code pairs sorted by name instead of full records.
    #[arg(long = ARG_CHOICES)]
    #[serde(default)]
    pub(crate) choices: bool,
}

/// CLI arguments for the `regions` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "regions",
    about = "Summarise the stored snapshot by region"
)]
#[ortho_config(prefix = "POPSTAT")]
pub(crate) struct RegionsArgs {
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
}

/// CLI arguments for the `top` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "top", about = "List the most populous stored countries")]
#[ortho_config(prefix = "POPSTAT")]
pub(crate) struct TopArgs {
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
    /// Number of countries to list.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

/// Which rows a report command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Report {
    Countries,
    Choices,
    Regions,
    Top { limit: usize },
}

/// Resolved report command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportConfig {
    pub(crate) storage: StorageSettings,
    pub(crate) report: Report,
}

impl CountriesArgs {
    pub(crate) fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ReportConfig::from(merged))
    }
}

impl RegionsArgs {
    pub(crate) fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ReportConfig::from(merged))
    }
}

impl TopArgs {
    pub(crate) fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ReportConfig::from(merged))
    }
}

impl From<CountriesArgs> for ReportConfig {
    fn from(args: CountriesArgs) -> Self {
        Self {
            storage: StorageSettings::resolve(
                args.database,
                args.connect_attempts,
                args.connect_delay_secs,
            ),
            report: if args.choices {
                Report::Choices
            } else {
                Report::Countries
            },
        }
    }
}

impl From<RegionsArgs> for ReportConfig {
    fn from(args: RegionsArgs) -> Self {
        Self {
            storage: StorageSettings::resolve(
                args.database,
                args.connect_attempts,
                args.connect_delay_secs,
            ),
            report: Report::Regions,
        }
    }
}

impl From<TopArgs> for ReportConfig {
    fn from(args: TopArgs) -> Self {
        Self {
            storage: StorageSettings::resolve(
                args.database,
                args.connect_attempts,
                args.connect_delay_secs,
            ),
            report: Report::Top {
                limit: args.limit.unwrap_or(DEFAULT_TOP_LIMIT),
            },
        }
    }
}

pub(crate) fn run_report_with(config: &ReportConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let connector = config.storage.connect()?;
    match config.report {
        Report::Countries => write_json(writer, &list_countries(&connector)?),
        Report::Choices => write_json(writer, &country_choices(&connector)?),
        Report::Regions => write_json(writer, &aggregate(&connector)?),
        Report::Top { limit } => write_json(writer, &top_countries(&connector, limit)?),
    }
}

#[cfg(test)]
pub(crate) fn top_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReportConfig, CliError> {
    let merged = TopArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(ReportConfig::from(merged))
}
