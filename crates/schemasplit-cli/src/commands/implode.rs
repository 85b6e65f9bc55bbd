//! Implode command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueHint};
use tracing::info;

use schemasplit_common_fs::{write_string_atomic, DiskTree};
use schemasplit_core::{implode, normalize, validate_with, Format, StructuralValidator};
use schemasplit_format::encode;

use crate::cli::CommandContext;
use crate::error::CliError;

/// Reassemble a schema document from a directory tree
#[derive(Debug, Parser)]
pub struct ImplodeCommand {
    /// Directory produced by `explode`
    #[arg(value_hint = ValueHint::DirPath)]
    pub dir: PathBuf,

    /// File to write the document to [default: stdout]
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    /// Output format [default: from --out extension, else json]
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Skip structural validation of the result
    #[arg(long)]
    pub no_validate: bool,
}

impl ImplodeCommand {
    /// Format of the written document.
    fn output_format(&self) -> Result<Format, CliError> {
        match (self.format, &self.out) {
            (Some(format), _) => Ok(format),
            (None, Some(out)) => Ok(Format::from_path(out)?),
            (None, None) => Ok(Format::Json),
        }
    }

    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let format = self.output_format()?;
        let document = implode(&DiskTree::new(&self.dir))?;
        let value = normalize(&document)?;

        if ctx.config.validate && !self.no_validate {
            validate_with(&StructuralValidator, &value)?;
        }

        let text = encode(&value, format)?;
        match &self.out {
            Some(out) => {
                write_string_atomic(out, &text)?;
                info!(out = %out.display(), %format, "wrote document");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
