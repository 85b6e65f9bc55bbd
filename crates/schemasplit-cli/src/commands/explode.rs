//! Explode command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use serde::Serialize;
use tracing::info;

use schemasplit_common_fs::DiskTree;
use schemasplit_core::{clean, explode, plan_explode, ExplodeSummary, Format};

use super::input::load_document;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Split a schema document into a directory tree
#[derive(Debug, Parser)]
pub struct ExplodeCommand {
    /// Schema document to split (.json, .yaml or .yml)
    #[arg(value_hint = ValueHint::FilePath)]
    pub schema: PathBuf,

    /// Directory to write the tree into
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Format of the written files [default: from config, else yaml]
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Skip structural validation of the input
    #[arg(long)]
    pub no_validate: bool,

    /// Remove files of a previous explode before writing
    #[arg(long)]
    pub clean: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ExplodeReport {
    out: String,
    format: Format,
    removed: usize,
    #[serde(flatten)]
    summary: ExplodeSummary,
    #[serde(skip)]
    list_files: bool,
}

impl FormattedOutput for ExplodeReport {
    fn format_text(&self) -> String {
        let mut text = format!(
            "Exploded {} entities into {} files in {} ({})",
            self.summary.entity_count(),
            self.summary.files.len(),
            self.out,
            self.format
        );
        if self.removed > 0 {
            text.push_str(&format!("\nRemoved {} stale files", self.removed));
        }
        if self.list_files {
            for file in &self.summary.files {
                text.push_str(&format!("\n  {file}"));
            }
        }
        text
    }
}

impl ExplodeCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let format = self.format.unwrap_or(ctx.config.format);
        let validate = ctx.config.validate && !self.no_validate;
        let document = load_document(&self.schema, validate)?;

        let mut tree = DiskTree::new(&self.out);
        let mut removed = 0;
        if self.clean || ctx.config.clean {
            // Plan first so a document that cannot be exploded leaves the old tree alone
            plan_explode(&document, format)?;
            removed = clean(&mut tree)?;
            info!(removed, out = %self.out.display(), "cleaned previous tree");
        }

        let summary = explode(&document, format, &mut tree)?;

        if ctx.quiet && !self.json {
            return Ok(());
        }
        print_output(
            self.json,
            &ExplodeReport {
                out: self.out.display().to_string(),
                format,
                removed,
                summary,
                list_files: ctx.verbose > 0,
            },
        )
    }
}
