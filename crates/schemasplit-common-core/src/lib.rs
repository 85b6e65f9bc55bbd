//! schemasplit common core types and utilities.

pub mod error;
pub mod result;

pub use error::{Error, ErrorCategory, Result, Violation};
pub use result::ResultExt;
