//! Text codecs for the two supported serialization formats.
//!
//! The engine works on `serde_json::Value`; this crate turns values into
//! text and back. Output is deterministic: `serde_json::Map` keeps keys
//! sorted, and both encoders end with a single newline.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use schemasplit_common_core::{Error, Result};

/// Serialization format of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl Format {
    /// Every supported format, in probing order.
    pub const ALL: [Format; 2] = [Format::Json, Format::Yaml];

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Parse an extension (without the dot). `yml` is accepted for reading.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect the format of a file from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension).ok_or_else(|| Error::UnknownFormat {
            path: path.display().to_string(),
            extension: extension.to_string(),
        })
    }

    /// Encode a value as text in this format.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        encode(value, self)
    }

    /// Decode text in this format.
    pub fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T> {
        decode(text, self)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| Error::UnknownFormat {
            path: String::new(),
            extension: s.to_string(),
        })
    }
}

/// Encode a value as text.
pub fn encode<T: Serialize + ?Sized>(value: &T, format: Format) -> Result<String> {
    let mut text = match format {
        Format::Json => serde_json::to_string_pretty(value)
            .map_err(|e| Error::serialization(e.to_string(), None))?,
        Format::Yaml => {
            serde_yaml::to_string(value).map_err(|e| Error::serialization(e.to_string(), None))?
        }
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Decode text into a value.
pub fn decode<T: DeserializeOwned>(text: &str, format: Format) -> Result<T> {
    match format {
        Format::Json => {
            serde_json::from_str(text).map_err(|e| Error::serialization(e.to_string(), None))
        }
        Format::Yaml => {
            serde_yaml::from_str(text).map_err(|e| Error::serialization(e.to_string(), None))
        }
    }
}

/// Decode a file's text, picking the format from its extension and naming the
/// file in any error.
pub fn decode_file(path: &str, text: &str) -> Result<Value> {
    let format = Format::from_path(path)?;
    decode(text, format).map_err(|e| match e {
        Error::Serialization { message, .. } => Error::serialization(message, Some(path)),
        other => other,
    })
}
