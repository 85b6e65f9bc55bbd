//! Configuration types.

use serde::{Deserialize, Serialize};

use schemasplit_common_log::LogConfig;
use schemasplit_format::Format;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemasplitConfig {
    /// Output format used by `explode` when no `--format` is given.
    pub format: Format,
    /// Run the structural validator around explode and implode.
    pub validate: bool,
    /// Remove previously exploded files before writing a new tree.
    pub clean: bool,
    /// Logging configuration.
    pub log: LogConfig,
}

impl Default for SchemasplitConfig {
    fn default() -> Self {
        Self {
            format: Format::Yaml,
            validate: true,
            clean: false,
            log: LogConfig::default(),
        }
    }
}
