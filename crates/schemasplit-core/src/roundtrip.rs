//! Explode-then-implode verification.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use schemasplit_common_core::{Error, Result};
use schemasplit_common_fs::MemoryTree;
use schemasplit_format::Format;

use crate::explode::explode;
use crate::implode::implode;
use crate::schema::SchemaDocument;

/// A document as a plain JSON value with sorted keys, suitable for comparing.
pub fn normalize(document: &SchemaDocument) -> Result<Value> {
    serde_json::to_value(document).map_err(|e| Error::serialization(e.to_string(), None))
}

/// One place where the round-tripped document differs from the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    /// JSON pointer to the differing value.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
}

/// Outcome of [`verify_roundtrip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripReport {
    pub format: Format,
    /// Number of files the exploded form consists of.
    pub files: usize,
    pub differences: Vec<Difference>,
}

impl RoundTripReport {
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Explode `document` into memory, implode it back and compare.
pub fn verify_roundtrip(document: &SchemaDocument, format: Format) -> Result<RoundTripReport> {
    let mut tree = MemoryTree::new();
    let summary = explode(document, format, &mut tree)?;
    let restored = implode(&tree)?;

    let mut differences = Vec::new();
    diff_values("", &normalize(document)?, &normalize(&restored)?, &mut differences);

    info!(%format, differences = differences.len(), "verified round trip");
    Ok(RoundTripReport {
        format,
        files: summary.files.len(),
        differences,
    })
}

fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn diff_values(path: &str, expected: &Value, actual: &Value, out: &mut Vec<Difference>) {
    match (expected, actual) {
        (Value::Object(left), Value::Object(right)) => {
            for (key, value) in left {
                let child = format!("{path}/{}", escape(key));
                match right.get(key) {
                    Some(other) => diff_values(&child, value, other, out),
                    None => out.push(Difference {
                        path: child,
                        expected: Some(value.clone()),
                        actual: None,
                    }),
                }
            }
            for (key, value) in right {
                if !left.contains_key(key) {
                    out.push(Difference {
                        path: format!("{path}/{}", escape(key)),
                        expected: None,
                        actual: Some(value.clone()),
                    });
                }
            }
        }
        (left, right) if left != right => {
            debug!(path, "value differs");
            out.push(Difference {
                path: path.to_string(),
                expected: Some(left.clone()),
                actual: Some(right.clone()),
            });
        }
        _ => {}
    }
}
