//! Verify command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use serde::Serialize;

use schemasplit_core::{verify_roundtrip, Format, RoundTripReport};

use super::input::load_document;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Check that a schema survives explode and implode unchanged
#[derive(Debug, Parser)]
pub struct VerifyCommand {
    /// Schema document to check
    #[arg(value_hint = ValueHint::FilePath)]
    pub schema: PathBuf,

    /// Only check this format [default: both]
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Print the reports as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct VerifyOutput {
    reports: Vec<RoundTripReport>,
}

impl FormattedOutput for VerifyOutput {
    fn format_text(&self) -> String {
        let mut lines = Vec::new();
        for report in &self.reports {
            if report.is_identical() {
                lines.push(format!("ok ({}, {} files)", report.format, report.files));
                continue;
            }
            lines.push(format!(
                "mismatch ({}, {} differences)",
                report.format,
                report.differences.len()
            ));
            for difference in &report.differences {
                lines.push(format!("  {}", difference.path));
            }
        }
        lines.join("\n")
    }
}

impl VerifyCommand {
    pub fn execute(&self, _ctx: &CommandContext) -> Result<(), CliError> {
        let document = load_document(&self.schema, false)?;
        let formats = match self.format {
            Some(format) => vec![format],
            None => Format::ALL.to_vec(),
        };

        let reports = formats
            .into_iter()
            .map(|format| verify_roundtrip(&document, format))
            .collect::<Result<Vec<_>, _>>()?;

        let differences: usize = reports.iter().map(|r| r.differences.len()).sum();
        print_output(self.json, &VerifyOutput { reports })?;

        if differences > 0 {
            return Err(CliError::Mismatch { differences });
        }
        Ok(())
    }
}
