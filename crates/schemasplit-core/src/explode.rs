//! Split a schema document into a file tree.
//!
//! Explode runs in two phases. [`plan_explode`] maps every token, splits
//! descriptions and encodes every file in memory; any malformed token or path
//! collision fails here, before a single byte is written. [`explode`] then
//! writes the plan out through a [`TreeSink`].
//!
//! An entity written without a sibling description also clears any sibling
//! left behind by an earlier explode, so a shortened or dropped description
//! does not come back on the next implode.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, info_span};

use schemasplit_common_core::{Error, Result, Violation};
use schemasplit_common_fs::TreeSink;
use schemasplit_format::{encode, Format};

use crate::description::{self, DESCRIPTION_EXTENSION};
use crate::layout::{self, is_language_name, BASE, CONFIG, PROVIDER};
use crate::schema::{Collection, EntityKind, EntitySpec, SchemaDocument};
use crate::token::map_token;

/// Field injected into every stored entity file.
pub const TOKEN_FIELD: &str = "$token";

/// One file to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: String,
    pub contents: String,
}

/// Every file an explode will write, base document last.
#[derive(Debug, Clone, Default)]
pub struct ExplodePlan {
    pub files: Vec<PlannedFile>,
    /// Sibling description paths of entities that no longer have one.
    pub stale: Vec<String>,
    pub summary: ExplodeSummary,
}

/// What an explode produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExplodeSummary {
    /// Paths written, sorted.
    pub files: Vec<String>,
    /// Entities written per kind.
    pub entities: BTreeMap<EntityKind, usize>,
    /// Sibling description files written.
    pub descriptions: usize,
    /// Language files written.
    pub languages: usize,
}

impl ExplodeSummary {
    /// Total entities written.
    pub fn entity_count(&self) -> usize {
        self.entities.values().sum()
    }
}

/// Compute every file of the exploded form without writing anything.
pub fn plan_explode(document: &SchemaDocument, format: Format) -> Result<ExplodePlan> {
    let mut plan = ExplodePlan::default();
    let mut base = SchemaDocument {
        metadata: document.metadata.clone(),
        ..SchemaDocument::default()
    };

    for kind in EntityKind::ALL {
        match document.collection(kind) {
            Some(collection) if !collection.is_empty() => {
                plan_collection(&mut plan, kind, collection, format)?;
            }
            // Empty or absent collections stay in the base document as they are
            other => *base.collection_mut(kind) = other.cloned(),
        }
    }

    if let Some(config) = &document.config {
        plan.push(layout::section_file(CONFIG, format), encode(config, format)?);
    }
    if let Some(provider) = &document.provider {
        plan.push(layout::section_file(PROVIDER, format), encode(provider, format)?);
    }

    match &document.language {
        Some(language) if !language.is_empty() => {
            for (name, value) in language {
                if !is_language_name(name) {
                    return Err(Error::Validation {
                        violations: vec![Violation::new(
                            format!("/language/{name}"),
                            "language name cannot be stored as a file name",
                        )],
                    });
                }
                plan.push(layout::language_file(name, format), encode(value, format)?);
                plan.summary.languages += 1;
            }
        }
        other => base.language = other.clone(),
    }

    plan.push(layout::section_file(BASE, format), encode(&base, format)?);
    plan.summary.files.sort();
    Ok(plan)
}

fn plan_collection(
    plan: &mut ExplodePlan,
    kind: EntityKind,
    collection: &Collection,
    format: Format,
) -> Result<()> {
    let mut claimed: HashMap<String, &str> = HashMap::new();

    for (token, spec) in collection {
        let location = map_token(kind, token)?;
        let path = location.file(format.extension());

        if let Some(first) = claimed.insert(path.clone(), token) {
            return Err(Error::PathCollision {
                kind: kind.to_string(),
                path,
                first: first.to_string(),
                second: token.clone(),
            });
        }

        let (stored, external) = description::split(spec.clone());
        let value = stored_entity(kind, token, stored)?;
        plan.push(path, encode(&value, format)?);

        let sibling = location.file(DESCRIPTION_EXTENSION);
        match external {
            Some(text) => {
                plan.push(sibling, text);
                plan.summary.descriptions += 1;
            }
            None => plan.stale.push(sibling),
        }
    }

    plan.summary.entities.insert(kind, collection.len());
    Ok(())
}

/// The on-disk shape of an entity: its fields plus `$token`.
fn stored_entity(kind: EntityKind, token: &str, entity: EntitySpec) -> Result<Value> {
    if entity.fields.contains_key(TOKEN_FIELD) {
        return Err(Error::Validation {
            violations: vec![Violation::new(
                format!("/{kind}/{token}/{TOKEN_FIELD}"),
                "reserved field",
            )],
        });
    }

    let mut map = Map::new();
    map.insert(TOKEN_FIELD.to_string(), Value::String(token.to_string()));
    if let Some(description) = entity.description {
        map.insert("description".to_string(), Value::String(description));
    }
    map.extend(entity.fields);
    Ok(Value::Object(map))
}

impl ExplodePlan {
    fn push(&mut self, path: String, contents: String) {
        self.summary.files.push(path.clone());
        self.files.push(PlannedFile { path, contents });
    }
}

/// Explode `document` into `sink` using `format` for every structured file.
pub fn explode<S: TreeSink + ?Sized>(
    document: &SchemaDocument,
    format: Format,
    sink: &mut S,
) -> Result<ExplodeSummary> {
    let span = info_span!("explode", %format);
    let _guard = span.enter();

    let plan = plan_explode(document, format)?;
    let mut removed = 0;
    for path in &plan.stale {
        if sink.remove(path)? {
            debug!(path = %path, "removed stale description");
            removed += 1;
        }
    }
    for file in &plan.files {
        sink.write(&file.path, &file.contents)?;
        debug!(path = %file.path, bytes = file.contents.len(), "wrote");
    }

    info!(
        files = plan.summary.files.len(),
        entities = plan.summary.entity_count(),
        descriptions = plan.summary.descriptions,
        removed,
        "exploded schema"
    );
    Ok(plan.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemasplit_common_fs::{MemoryTree, TreeSource};
    use schemasplit_format::decode;
    use serde_json::json;

    fn document(value: Value) -> SchemaDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_explode_layout() {
        let doc = document(json!({
            "name": "pkg",
            "version": "1.0.0",
            "config": {"variables": {"region": {"type": "string"}}},
            "provider": {"description": "The provider."},
            "language": {"nodejs": {"packageName": "@pkg/pkg"}, "python": {}},
            "resources": {
                "pkg:index:Widget": {"description": "short", "properties": {}},
                "pkg:storage/bucket:Bucket": {"description": "x".repeat(401)}
            },
            "functions": {"pkg:index/getWidget:getWidget": {"inputs": {}}},
            "types": {}
        }));

        let mut tree = MemoryTree::new();
        let summary = explode(&doc, Format::Json, &mut tree).unwrap();

        let paths: Vec<_> = tree.files().keys().cloned().collect();
        assert_eq!(
            paths,
            vec![
                "base.json",
                "config.json",
                "index/functions/getWidget.json",
                "index/resources/Widget.json",
                "language.nodejs.json",
                "language.python.json",
                "provider.json",
                "storage/bucket/resources/Bucket.json",
                "storage/bucket/resources/Bucket.md",
            ]
        );
        assert_eq!(summary.files, paths);
        let plan = plan_explode(&doc, Format::Json).unwrap();
        assert_eq!(plan.files.last().map(|f| f.path.as_str()), Some("base.json"));
        assert_eq!(summary.entity_count(), 3);
        assert_eq!(summary.descriptions, 1);
        assert_eq!(summary.languages, 2);

        let base: Value = decode(tree.get("base.json").unwrap(), Format::Json).unwrap();
        assert_eq!(base, json!({"name": "pkg", "version": "1.0.0", "types": {}}));

        let widget: Value =
            decode(tree.get("index/resources/Widget.json").unwrap(), Format::Json).unwrap();
        assert_eq!(
            widget,
            json!({"$token": "pkg:index:Widget", "description": "short", "properties": {}})
        );

        let bucket: Value = decode(
            tree.get("storage/bucket/resources/Bucket.json").unwrap(),
            Format::Json,
        )
        .unwrap();
        assert_eq!(bucket, json!({"$token": "pkg:storage/bucket:Bucket"}));
        assert_eq!(
            tree.get("storage/bucket/resources/Bucket.md"),
            Some("x".repeat(401).as_str())
        );
    }

    #[test]
    fn test_token_field_comes_first() {
        let doc = document(json!({
            "name": "pkg",
            "types": {"pkg:index:T": {"description": "d", "aaa": 1}}
        }));
        let mut tree = MemoryTree::new();
        explode(&doc, Format::Yaml, &mut tree).unwrap();

        let text = tree.get("index/types/T.yaml").unwrap();
        assert!(text.starts_with("$token: pkg:index:T\n"), "{text}");
    }

    #[test]
    fn test_absent_sections_write_nothing() {
        let doc = document(json!({"name": "pkg"}));
        let mut tree = MemoryTree::new();
        let summary = explode(&doc, Format::Yaml, &mut tree).unwrap();

        assert_eq!(summary.files, vec!["base.yaml"]);
        assert_eq!(tree.get("base.yaml"), Some("name: pkg\n"));
    }

    #[test]
    fn test_empty_language_stays_inline() {
        let doc = document(json!({"name": "pkg", "language": {}}));
        let mut tree = MemoryTree::new();
        explode(&doc, Format::Json, &mut tree).unwrap();

        assert_eq!(tree.len(), 1);
        let base: Value = decode(tree.get("base.json").unwrap(), Format::Json).unwrap();
        assert_eq!(base, json!({"name": "pkg", "language": {}}));
    }

    #[test]
    fn test_malformed_token_writes_nothing() {
        let doc = document(json!({
            "name": "pkg",
            "config": {},
            "types": {"pkg:index:Good": {}, "not-a-token": {}}
        }));
        let mut tree = MemoryTree::new();
        let err = explode(&doc, Format::Json, &mut tree).unwrap_err();

        assert!(matches!(err, Error::MalformedToken { ref token, .. } if token == "not-a-token"));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_path_collision_is_rejected() {
        let doc = document(json!({
            "name": "pkg",
            "resources": {"pkg:foo:Foo": {}, "pkg:foo/Foo:Foo": {}}
        }));
        let mut tree = MemoryTree::new();

        match explode(&doc, Format::Json, &mut tree).unwrap_err() {
            Error::PathCollision { kind, path, first, second } => {
                assert_eq!(kind, "resources");
                assert_eq!(path, "foo/resources/Foo.json");
                assert_eq!(first, "pkg:foo/Foo:Foo");
                assert_eq!(second, "pkg:foo:Foo");
            }
            other => panic!("Expected PathCollision, got {other:?}"),
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_same_name_in_different_kinds_is_fine() {
        let doc = document(json!({
            "name": "pkg",
            "resources": {"pkg:index:Foo": {}},
            "types": {"pkg:index:Foo": {}}
        }));
        let mut tree = MemoryTree::new();
        explode(&doc, Format::Json, &mut tree).unwrap();
        assert!(tree.exists("index/resources/Foo.json"));
        assert!(tree.exists("index/types/Foo.json"));
    }

    #[test]
    fn test_reserved_token_field_is_rejected() {
        let doc = document(json!({
            "name": "pkg",
            "types": {"pkg:index:T": {"$token": "pkg:index:Other"}}
        }));
        let err = plan_explode(&doc, Format::Json).unwrap_err();
        assert_eq!(err.violations()[0].path, "/types/pkg:index:T/$token");
    }

    #[test]
    fn test_unstorable_language_name_is_rejected() {
        let doc = document(json!({"name": "pkg", "language": {"a.b": {}}}));
        let err = plan_explode(&doc, Format::Json).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_re_explode_drops_outdated_sibling() {
        let long = document(json!({
            "name": "pkg",
            "types": {
                "pkg:index:Kept": {"description": "k".repeat(500)},
                "pkg:index:T": {"description": "x".repeat(401), "type": "string"}
            }
        }));
        let mut tree = MemoryTree::new();
        explode(&long, Format::Json, &mut tree).unwrap();
        assert!(tree.exists("index/types/T.md"));

        let dropped = document(json!({
            "name": "pkg",
            "types": {
                "pkg:index:Kept": {"description": "k".repeat(500)},
                "pkg:index:T": {"type": "string"}
            }
        }));
        explode(&dropped, Format::Json, &mut tree).unwrap();
        assert!(!tree.exists("index/types/T.md"));
        assert!(tree.exists("index/types/Kept.md"));

        let restored = crate::implode(&tree).unwrap();
        assert_eq!(restored, dropped);
    }

    #[test]
    fn test_stale_siblings_are_planned_not_written() {
        let doc = document(json!({
            "name": "pkg",
            "resources": {"pkg:index:A": {"description": "short"}, "pkg:index:B": {}}
        }));
        let plan = plan_explode(&doc, Format::Yaml).unwrap();
        assert_eq!(plan.stale, vec!["index/resources/A.md", "index/resources/B.md"]);
        assert!(plan.files.iter().all(|f| !f.path.ends_with(".md")));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let doc = document(json!({
            "name": "pkg",
            "resources": {"pkg:b:B": {"x": 1}, "pkg:a:A": {"y": [1, 2]}},
            "language": {"go": {"importBasePath": "example.com/pkg"}}
        }));
        let first = plan_explode(&doc, Format::Yaml).unwrap();
        let second = plan_explode(&doc, Format::Yaml).unwrap();
        assert_eq!(first.files, second.files);
    }
}
