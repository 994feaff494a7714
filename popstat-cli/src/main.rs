//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use popstat_cli::CliError;

fn main() {
    match popstat_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("popstat: {err}");
            std::process::exit(1);
        }
    }
}
