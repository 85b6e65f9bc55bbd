//! Configuration file loading and parsing.

use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

use crate::env::{apply_env_overrides, EnvError};
use crate::types::SchemasplitConfig;

/// Location of the config file relative to the project directory.
pub const CONFIG_FILE: &str = ".schemasplit/config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", .line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the config file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_FILE)
    }

    /// Load configuration from `.schemasplit/config.yaml`, falling back to
    /// defaults when the file does not exist, then apply env overrides.
    pub fn load(&self) -> Result<SchemasplitConfig, ConfigError> {
        let config_path = self.config_path();

        let mut config = if config_path.exists() {
            Self::parse_file(&config_path)?
        } else {
            SchemasplitConfig::default()
        };

        apply_env_overrides(&mut config)?;
        self.validate(&config)?;
        Ok(config)
    }

    /// Load an explicitly named config file. A missing file is an error.
    pub fn load_file(path: impl AsRef<Path>) -> Result<SchemasplitConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut config = Self::parse_file(path)?;
        apply_env_overrides(&mut config)?;
        let loader = Self::new(path.parent().unwrap_or_else(|| Path::new(".")));
        loader.validate(&config)?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<SchemasplitConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let expanded = expand_env_vars(&contents)?;

        if expanded.trim().is_empty() {
            return Ok(SchemasplitConfig::default());
        }

        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    fn validate(&self, config: &SchemasplitConfig) -> Result<(), ConfigError> {
        if let Some(file_path) = &config.log.file_path {
            if file_path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: "log.file_path must not be empty".to_string(),
                });
            }
            if file_path.is_dir() {
                return Err(ConfigError::ValidationError {
                    message: format!("log.file_path is a directory: {}", file_path.display()),
                });
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
        ConfigError::ValidationError {
            message: e.to_string(),
        }
    })?;

    let mut missing = None;
    let expanded = re.replace_all(content, |cap: &regex::Captures<'_>| {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match cap.get(2) {
                Some(default) => default.as_str().to_string(),
                None => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            },
        }
    });

    match missing {
        Some(var) => Err(ConfigError::EnvVarNotFound { var }),
        None => Ok(expanded.into_owned()),
    }
}
