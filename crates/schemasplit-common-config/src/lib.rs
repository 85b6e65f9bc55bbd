//! Configuration types for schemasplit.
//!
//! This crate provides the configuration used by the `schemasplit` binary,
//! read from `.schemasplit/config.yaml` in the project directory.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;
