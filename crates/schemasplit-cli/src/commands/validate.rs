//! Validate command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use serde::Serialize;

use schemasplit_common_core::Violation;
use schemasplit_core::{StructuralValidator, Validator};

use super::input::read_value;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Check the structure of a schema document
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    /// Schema document to check
    #[arg(value_hint = ValueHint::FilePath)]
    pub schema: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    valid: bool,
    violations: Vec<Violation>,
}

impl FormattedOutput for ValidateOutput {
    fn format_text(&self) -> String {
        if self.valid {
            return "ok".to_string();
        }
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ValidateCommand {
    pub fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        let value = read_value(&self.schema)?;
        let violations = StructuralValidator.validate(&value).err().unwrap_or_default();
        let count = violations.len();

        print_output(
            self.json,
            &ValidateOutput {
                valid: count == 0,
                violations,
            },
        )?;

        if count == 0 {
            return Ok(());
        }
        // Already printed above, so the error carries none
        Err(CliError::Validation {
            message: format!("{count} violation(s) in {}", self.schema.display()),
            violations: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_output() {
        let ok = ValidateOutput {
            valid: true,
            violations: vec![],
        };
        assert_eq!(ok.format_text(), "ok");

        let bad = ValidateOutput {
            valid: false,
            violations: vec![
                Violation::new("/name", "is required"),
                Violation::new("/types/x", "must be a mapping"),
            ],
        };
        assert_eq!(
            bad.format_text(),
            "/name: is required\n/types/x: must be a mapping"
        );
    }
}
