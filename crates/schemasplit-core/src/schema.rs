//! In-memory shape of a package schema document.
//!
//! Only the parts the transform needs are typed: the three token-addressed
//! collections, the singleton sections, and each entity's `description`.
//! Everything else is carried as opaque JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token-addressed collection of entities.
pub type Collection = BTreeMap<String, EntitySpec>;

/// The three collections that are split into one file per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Functions,
    Resources,
    Types,
}

impl EntityKind {
    /// Every kind, in the order they are written.
    pub const ALL: [EntityKind; 3] = [Self::Functions, Self::Resources, Self::Types];

    /// Field name in the document, also used as the directory name on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Functions => "functions",
            Self::Resources => "resources",
            Self::Types => "types",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One function, resource or type.
///
/// `description` is the only field the transform looks at; the rest of the
/// payload passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntitySpec {
    /// Entity with only a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            fields: Map::new(),
        }
    }

    /// Add an opaque field.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// A package schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Collection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Collection>,
    /// Name, version, description and any other top-level fields.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl SchemaDocument {
    /// Collection for `kind`.
    pub fn collection(&self, kind: EntityKind) -> Option<&Collection> {
        match kind {
            EntityKind::Functions => self.functions.as_ref(),
            EntityKind::Resources => self.resources.as_ref(),
            EntityKind::Types => self.types.as_ref(),
        }
    }

    /// Mutable slot for `kind`.
    pub fn collection_mut(&mut self, kind: EntityKind) -> &mut Option<Collection> {
        match kind {
            EntityKind::Functions => &mut self.functions,
            EntityKind::Resources => &mut self.resources,
            EntityKind::Types => &mut self.types,
        }
    }

    /// Package name, if set.
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }

    /// Number of entities across all collections.
    pub fn entity_count(&self) -> usize {
        EntityKind::ALL
            .iter()
            .filter_map(|kind| self.collection(*kind))
            .map(BTreeMap::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_parses_sections_and_metadata() {
        let value = json!({
            "name": "aws",
            "version": "1.2.3",
            "config": {"variables": {}},
            "language": {"nodejs": {"packageName": "@pulumi/aws"}},
            "resources": {
                "aws:s3/bucket:Bucket": {
                    "description": "A bucket.",
                    "properties": {"arn": {"type": "string"}}
                }
            }
        });

        let doc: SchemaDocument = serde_json::from_value(value).unwrap();
        assert_eq!(doc.name(), Some("aws"));
        assert_eq!(doc.metadata.get("version"), Some(&json!("1.2.3")));
        assert!(!doc.metadata.contains_key("resources"));
        assert!(doc.functions.is_none());

        let bucket = &doc.resources.as_ref().unwrap()["aws:s3/bucket:Bucket"];
        assert_eq!(bucket.description.as_deref(), Some("A bucket."));
        assert!(bucket.fields.contains_key("properties"));
        assert!(!bucket.fields.contains_key("description"));
        assert_eq!(doc.entity_count(), 1);
    }

    #[test]
    fn test_absent_sections_are_not_serialized() {
        let mut metadata = Map::new();
        metadata.insert("name".into(), json!("pkg"));
        let doc = SchemaDocument {
            metadata,
            types: Some(Collection::new()),
            ..SchemaDocument::default()
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"name": "pkg", "types": {}}));
    }

    #[test]
    fn test_null_sections_normalize_to_absent() {
        let doc: SchemaDocument =
            serde_json::from_value(json!({"name": "pkg", "config": null, "functions": null}))
                .unwrap();
        assert!(doc.config.is_none());
        assert!(doc.functions.is_none());
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"name": "pkg"}));
    }

    #[test]
    fn test_entity_spec_builder() {
        let spec = EntitySpec::with_description("hi").field("type", json!("object"));
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"description": "hi", "type": "object"})
        );
    }

    #[test]
    fn test_collection_accessors() {
        let mut doc = SchemaDocument::default();
        doc.collection_mut(EntityKind::Types)
            .get_or_insert_with(Collection::new)
            .insert("pkg:index:T".into(), EntitySpec::default());
        assert_eq!(doc.collection(EntityKind::Types).map(|c| c.len()), Some(1));
        assert!(doc.collection(EntityKind::Resources).is_none());
        assert_eq!(EntityKind::Resources.to_string(), "resources");
    }
}
