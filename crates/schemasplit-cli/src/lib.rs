//! schemasplit CLI library
//!
//! Argument parsing, command implementations and error reporting for the
//! `schemasplit` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::{CliError, Exit};
