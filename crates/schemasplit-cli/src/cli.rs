//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use schemasplit_common_config::{ConfigLoader, SchemasplitConfig};
use schemasplit_common_log::spans::{command_span, Timer};
use schemasplit_common_log::{LogConfig, LogLevel};

use crate::commands::{ExplodeCommand, ImplodeCommand, ValidateCommand, VerifyCommand};
use crate::error::CliError;

/// schemasplit - split a package schema into one file per entity and back
///
/// Functions, resources and types are written to
/// `<module>[/<submodule>]/<kind>/<name>.<ext>`; everything else goes to
/// `base`, `config`, `provider` and `language.<name>` files.
#[derive(Debug, Parser)]
#[command(
    name = "schemasplit",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "SCHEMASPLIT_CONFIG",
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a schema document into a directory tree
    Explode(ExplodeCommand),

    /// Reassemble a schema document from a directory tree
    Implode(ImplodeCommand),

    /// Check that a schema survives explode and implode unchanged
    Verify(VerifyCommand),

    /// Check the structure of a schema document
    Validate(ValidateCommand),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Explode(_) => "explode",
            Self::Implode(_) => "implode",
            Self::Verify(_) => "verify",
            Self::Validate(_) => "validate",
        }
    }

    fn target(&self) -> String {
        match self {
            Self::Explode(cmd) => cmd.schema.display().to_string(),
            Self::Implode(cmd) => cmd.dir.display().to_string(),
            Self::Verify(cmd) => cmd.schema.display().to_string(),
            Self::Validate(cmd) => cmd.schema.display().to_string(),
        }
    }
}

impl Cli {
    /// Load configuration from `--config` or the current directory
    pub fn load_config(&self) -> Result<SchemasplitConfig, CliError> {
        let config = match &self.config {
            Some(path) => ConfigLoader::load_file(path)?,
            None => ConfigLoader::default().load()?,
        };
        Ok(config)
    }

    /// Logging settings after applying `-v` / `-q` on top of `base`.
    pub fn log_config(&self, base: &LogConfig) -> LogConfig {
        let level = match (self.quiet, self.verbose) {
            (true, _) => LogLevel::Error,
            (false, 0) => base.level,
            (false, 1) => LogLevel::Info,
            (false, 2) => LogLevel::Debug,
            (false, _) => LogLevel::Trace,
        };
        LogConfig {
            level,
            ..base.clone()
        }
    }

    /// Execute the selected command
    pub fn execute(self, config: SchemasplitConfig) -> Result<(), CliError> {
        let span = command_span(self.command.name(), &self.command.target());
        let _guard = span.enter();
        let timer = Timer::start(self.command.name());

        let ctx = CommandContext {
            config,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        let result = match &self.command {
            Command::Explode(cmd) => cmd.execute(&ctx),
            Command::Implode(cmd) => cmd.execute(&ctx),
            Command::Verify(cmd) => cmd.execute(&ctx),
            Command::Validate(cmd) => cmd.execute(&ctx),
        };
        timer.finish();
        result
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: SchemasplitConfig,
    pub verbose: u8,
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use schemasplit_format::Format;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_explode() {
        let cli = Cli::try_parse_from([
            "schemasplit",
            "-vv",
            "explode",
            "schema.yaml",
            "--out",
            "pkg",
            "--format",
            "json",
            "--clean",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Explode(cmd) => {
                assert_eq!(cmd.schema, PathBuf::from("schema.yaml"));
                assert_eq!(cmd.out, PathBuf::from("pkg"));
                assert_eq!(cmd.format, Some(Format::Json));
                assert!(cmd.clean);
                assert!(!cmd.no_validate);
            }
            other => panic!("Expected explode, got {other:?}"),
        }
    }

    #[test]
    fn test_explode_requires_out() {
        assert!(Cli::try_parse_from(["schemasplit", "explode", "schema.yaml"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["schemasplit", "-q", "-v", "validate", "s.json"]).is_err());
    }

    #[test]
    fn test_log_level_from_flags() {
        let base = LogConfig::default();

        let cli = Cli::try_parse_from(["schemasplit", "-q", "validate", "s.json"]).unwrap();
        assert_eq!(cli.log_config(&base).level, LogLevel::Error);

        let cli = Cli::try_parse_from(["schemasplit", "-vvv", "validate", "s.json"]).unwrap();
        assert_eq!(cli.log_config(&base).level, LogLevel::Trace);

        let quiet_base = LogConfig {
            level: LogLevel::Warn,
            ..LogConfig::default()
        };
        let cli = Cli::try_parse_from(["schemasplit", "validate", "s.json"]).unwrap();
        assert_eq!(cli.log_config(&quiet_base).level, LogLevel::Warn);
    }

    #[test]
    fn test_command_target() {
        let cli = Cli::try_parse_from(["schemasplit", "implode", "tree"]).unwrap();
        assert_eq!(cli.command.name(), "implode");
        assert_eq!(cli.command.target(), "tree");
    }
}
