//! Reading the schema document named on the command line.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use schemasplit_common_core::Error;
use schemasplit_common_fs::{read_to_string, MAX_FILE_SIZE};
use schemasplit_core::{validate_with, SchemaDocument, StructuralValidator};
use schemasplit_format::decode_file;

use crate::error::CliError;

/// Read a schema file as a plain value, picking the decoder from its extension.
pub fn read_value(path: &Path) -> Result<Value, CliError> {
    let shown = path.display().to_string();
    let text = read_to_string(path, MAX_FILE_SIZE)?;
    debug!(path = %shown, bytes = text.len(), "read schema");
    Ok(decode_file(&shown, &text)?)
}

/// Read a schema file, optionally validate it, and parse it into a document.
pub fn load_document(path: &Path, validate: bool) -> Result<SchemaDocument, CliError> {
    let value = read_value(path)?;
    if validate {
        validate_with(&StructuralValidator, &value)?;
    }
    if !value.is_object() {
        return Err(Error::malformed_file(path.display().to_string(), "expected a mapping").into());
    }
    serde_json::from_value(value)
        .map_err(|e| Error::malformed_file(path.display().to_string(), e.to_string()).into())
}
