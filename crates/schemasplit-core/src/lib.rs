//! Lossless conversion between a single package schema document and an
//! exploded directory tree with one file per function, resource and type.
//!
//! ```text
//! document --explode--> file tree --implode--> document'
//! ```
//!
//! The tree layout is:
//!
//! ```text
//! base.<ext>
//! config.<ext>
//! provider.<ext>
//! language.<name>.<ext>
//! <module>/<kind>/<name>.<ext>
//! <module>/<submodule>/<kind>/<name>.<ext>
//! <same path>.md
//! ```
//!
//! Each entity file carries a `$token` field with the full token; implode
//! reads identity from that field and never from the directory structure.

pub mod description;
pub mod explode;
pub mod implode;
pub mod layout;
pub mod roundtrip;
pub mod schema;
pub mod token;
pub mod validate;

pub use explode::{explode, plan_explode, ExplodePlan, ExplodeSummary, PlannedFile};
pub use implode::implode;
pub use layout::{clean, exploded_files};
pub use roundtrip::{normalize, verify_roundtrip, Difference, RoundTripReport};
pub use schema::{Collection, EntityKind, EntitySpec, SchemaDocument};
pub use token::{map_token, Token, TokenPath};
pub use validate::{validate_with, StructuralValidator, Validator};

pub use schemasplit_common_core::{Error, Result, Violation};
pub use schemasplit_format::Format;
