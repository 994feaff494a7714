//! Stderr logging bootstrap for the CLI.
//!
//! Library crates emit `event=... status=...` records through the `log`
//! facade; this module installs the `flexi_logger` backend that prints them.

use flexi_logger::{Logger, LoggerHandle};

use crate::CliError;

/// Level used when none is configured.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

/// Start the stderr logger at `level`.
///
/// The returned handle must stay alive for records to be flushed.
pub(crate) fn init_logging(level: &str) -> Result<LoggerHandle, CliError> {
    let level = normalise_level(level)?;
    Logger::try_with_str(level)
        .map_err(CliError::StartLogger)?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(CliError::StartLogger)
}

pub(crate) fn normalise_level(level: &str) -> Result<&'static str, CliError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(CliError::InvalidLogLevel {
            level: other.to_owned(),
        }),
    }
}
