//! Command-line interface for the population statistics pipeline.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod error;
mod history;
mod logging;
mod output;
mod reload;
mod report;
mod sources;
mod storage;

pub use error::CliError;

use history::{HistoryArgs, run_history_with};
use reload::{ReloadArgs, run_reload_with};
use report::{CountriesArgs, RegionsArgs, TopArgs, run_report_with};
use sources::{DefaultSourceBuilder, SourceBuilder};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_CONNECT_ATTEMPTS: &str = "connect-attempts";
pub(crate) const ARG_CONNECT_DELAY_SECS: &str = "connect-delay-secs";
pub(crate) const ARG_COUNTRIES_BASE_URL: &str = "countries-base-url";
pub(crate) const ARG_HISTORY_BASE_URL: &str = "history-base-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_CHOICES: &str = "choices";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_COUNTRY: &str = "country";
pub(crate) const ENV_HISTORY_COUNTRY: &str = "POPSTAT_CMDS_HISTORY_COUNTRY";
pub(crate) const ENV_LOG_LEVEL: &str = "POPSTAT_LOG_LEVEL";

/// Run the popstat CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let _logger = logging::init_logging(&cli.log_level)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &DefaultSourceBuilder, &mut stdout)
}

fn dispatch(
    command: Command,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Reload(args) => run_reload_with(&args.into_config()?, builder, writer),
        Command::Countries(args) => run_report_with(&args.into_config()?, writer),
        Command::Regions(args) => run_report_with(&args.into_config()?, writer),
        Command::Top(args) => run_report_with(&args.into_config()?, writer),
        Command::History(args) => run_history_with(&args.into_config()?, builder, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "popstat",
    about = "Country population snapshots, regional summaries and histories",
    version
)]
struct Cli {
    /// Log level written to stderr (trace, debug, info, warn, error, off).
    #[arg(
        long = "log-level",
        global = true,
        env = ENV_LOG_LEVEL,
        default_value = logging::DEFAULT_LOG_LEVEL,
        value_name = "level"
    )]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the country snapshot and replace the stored one.
    Reload(ReloadArgs),
    /// List the stored countries.
    Countries(CountriesArgs),
    /// Summarise the stored snapshot by region.
    Regions(RegionsArgs),
    /// List the most populous stored countries.
    Top(TopArgs),
    /// Show the population history of a country.
    History(HistoryArgs),
}

#[cfg(test)]
mod tests;
