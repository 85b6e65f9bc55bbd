//! schemasplit CLI
//!
//! Main entry point for the `schemasplit` binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use schemasplit_cli::cli::Cli;
use schemasplit_cli::{CliError, Exit};
use schemasplit_common_log::LogConfig;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Configuration also carries the log settings, so it is loaded first
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = init_tracing(&cli, &LogConfig::from_env());
            return report(&e);
        }
    };

    if let Err(e) = init_tracing(&cli, &config.log) {
        return report(&e);
    }

    match cli.execute(config) {
        Ok(()) => Exit::Success.into(),
        Err(e) => report(&e),
    }
}

fn init_tracing(cli: &Cli, base: &LogConfig) -> Result<(), CliError> {
    schemasplit_common_log::init(&cli.log_config(base))?;
    Ok(())
}

fn report(e: &CliError) -> ExitCode {
    error!(code = e.code(), "{e}");
    eprintln!("error[{}]: {e}", e.code());
    for violation in e.violations() {
        eprintln!("  {violation}");
    }
    if let Some(hint) = e.hint() {
        eprintln!("  hint: {hint}");
    }
    e.exit_code().into()
}
