//! Error types for schemasplit.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level complaint raised by a structural validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Location of the offending value, e.g. `/resources/pkg:index:Foo/description`.
    pub path: String,
    /// Human-readable explanation.
    pub message: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.message)
    }
}

/// The main error type for schemasplit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A token does not decompose into `provider:modulePath:name`.
    #[error("malformed token `{token}`: {reason}")]
    MalformedToken { token: String, reason: String },

    /// Implode could not locate `base.*`.
    #[error("base document not found under {}", .root.display())]
    MissingBaseDocument { root: PathBuf },

    /// A stored entity file carries no string `$token` field.
    #[error("missing $token in {path}")]
    MissingTokenIdentity { path: String },

    /// A file extension is neither json nor yaml.
    #[error("unknown format `{extension}` for {path}")]
    UnknownFormat { path: String, extension: String },

    /// The document failed structural validation.
    #[error("validation failed with {} violation(s)", .violations.len())]
    Validation { violations: Vec<Violation> },

    /// Two distinct tokens of one kind map to the same file.
    #[error("tokens `{first}` and `{second}` both map to {path} ({kind})")]
    PathCollision {
        kind: String,
        path: String,
        first: String,
        second: String,
    },

    /// The same token was assembled twice.
    #[error("duplicate {kind} token `{token}` in {path}")]
    DuplicateToken {
        kind: String,
        token: String,
        path: String,
    },

    /// A file decoded but does not have the expected shape.
    #[error("malformed file {path}: {message}")]
    MalformedFile { path: String, message: String },

    /// Encoding or decoding failed.
    #[error("serialization error{}: {message}", .path.as_ref().map(|p| format!(" in {p}")).unwrap_or_default())]
    Serialization {
        message: String,
        path: Option<String>,
    },

    /// Underlying I/O failed.
    #[error("{message}")]
    FileSystem {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a malformed token error.
    pub fn malformed_token(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed file error.
    pub fn malformed_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error, optionally tied to a file.
    pub fn serialization(message: impl Into<String>, path: Option<&str>) -> Self {
        Self::Serialization {
            message: message.into(),
            path: path.map(str::to_string),
        }
    }

    /// Create a file system error without an underlying source.
    pub fn file_system(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. } => "E001",
            Self::MissingBaseDocument { .. } => "E002",
            Self::MissingTokenIdentity { .. } => "E003",
            Self::UnknownFormat { .. } => "E004",
            Self::Validation { .. } => "E005",
            Self::PathCollision { .. } => "E006",
            Self::DuplicateToken { .. } => "E007",
            Self::MalformedFile { .. } => "E008",
            Self::Serialization { .. } => "E009",
            Self::FileSystem { .. } => "E010",
        }
    }

    /// Coarse grouping used by the CLI to pick exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::FileSystem { .. } => ErrorCategory::FileSystem,
            _ => ErrorCategory::Input,
        }
    }

    /// Violations carried by a validation error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input document or tree is malformed.
    Input,
    /// The document was rejected by the validator.
    Validation,
    /// Reading or writing files failed.
    FileSystem,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            message: err.to_string(),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias using schemasplit's Error.
pub type Result<T> = std::result::Result<T, Error>;
