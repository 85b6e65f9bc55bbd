//! Environment variable handling.

use std::env;

use thiserror::Error;

use crate::types::SchemasplitConfig;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Environment variable names.
pub mod vars {
    pub const SCHEMASPLIT_FORMAT: &str = "SCHEMASPLIT_FORMAT";
    pub const SCHEMASPLIT_VALIDATE: &str = "SCHEMASPLIT_VALIDATE";
    pub const SCHEMASPLIT_CLEAN: &str = "SCHEMASPLIT_CLEAN";
}

/// Get a boolean variable.
pub fn get_bool(var: &str) -> Result<Option<bool>, EnvError> {
    match env::var(var) {
        Ok(v) => match v.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(EnvError::InvalidValue {
                var: var.to_string(),
                message: format!("expected a boolean, got `{v}`"),
            }),
        },
        Err(_) => Ok(None),
    }
}

/// Apply `SCHEMASPLIT_*` overrides to a loaded configuration.
pub fn apply_env_overrides(config: &mut SchemasplitConfig) -> Result<(), EnvError> {
    if let Ok(format) = env::var(vars::SCHEMASPLIT_FORMAT) {
        config.format = format.parse().map_err(|_| EnvError::InvalidValue {
            var: vars::SCHEMASPLIT_FORMAT.to_string(),
            message: format!("expected json or yaml, got `{format}`"),
        })?;
    }
    if let Some(validate) = get_bool(vars::SCHEMASPLIT_VALIDATE)? {
        config.validate = validate;
    }
    if let Some(clean) = get_bool(vars::SCHEMASPLIT_CLEAN)? {
        config.clean = clean;
    }
    config.log = std::mem::take(&mut config.log).with_env_overrides();
    Ok(())
}
