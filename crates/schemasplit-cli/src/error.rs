//! CLI error handling and exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use schemasplit_common_config::loader::ConfigError;
use schemasplit_common_core::{Error, ErrorCategory, Violation};
use schemasplit_common_log::LogError;

/// Application exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    InputError = 4,
    ValidationError = 5,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// CLI error type with rich context
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The schema document or exploded tree is malformed.
    #[error("{message}")]
    Input {
        message: String,
        code: &'static str,
        hint: Option<String>,
    },

    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<Violation>,
    },

    /// A round trip did not reproduce the input.
    #[error("round trip differs in {differences} place(s)")]
    Mismatch { differences: usize },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "C001",
            Self::Io { .. } => "C002",
            Self::Input { code, .. } => *code,
            Self::Validation { .. } => "C004",
            Self::Mismatch { .. } => "C005",
            Self::Other(_) => "C999",
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Input { .. } => Exit::InputError,
            Self::Validation { .. } | Self::Mismatch { .. } => Exit::ValidationError,
            Self::Other(_) => Exit::GeneralError,
        }
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::Input { hint, .. } => hint.as_deref(),
            Self::Mismatch { .. } => Some("Run with --json to see every differing path"),
            _ => None,
        }
    }

    /// Violations to list under the error, if any.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn input_hint(err: &Error) -> Option<String> {
    let hint = match err {
        Error::MissingBaseDocument { .. } => {
            "The directory must contain base.json or base.yaml at its root"
        }
        Error::UnknownFormat { .. } => "Use a .json, .yaml or .yml extension",
        Error::PathCollision { .. } => {
            "A submodule equal to the entity name is dropped from the path; rename one of the tokens"
        }
        Error::DuplicateToken { .. } => {
            "Remove the stale file, or explode with --clean so old files do not linger"
        }
        Error::MissingTokenIdentity { .. } => "Every entity file needs a string `$token` field",
        _ => return None,
    };
    Some(hint.to_string())
}

// Conversion implementations
impl From<Error> for CliError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err.category() {
            ErrorCategory::Validation => Self::Validation {
                message,
                violations: err.violations().to_vec(),
            },
            ErrorCategory::FileSystem => {
                let path = match &err {
                    Error::FileSystem { path, .. } => path.as_ref().map(PathBuf::from),
                    _ => None,
                };
                Self::Io {
                    message,
                    path,
                    source: Some(Box::new(err)),
                }
            }
            ErrorCategory::Input => Self::Input {
                code: err.code(),
                hint: input_hint(&err),
                message,
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check your .schemasplit/config.yaml".to_string()),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(Box::new(err)),
            hint: Some("Check the log settings in your configuration".to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(anyhow::anyhow!("JSON serialization failed: {err}"))
    }
}
