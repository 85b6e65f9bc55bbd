//! Test utilities for schemasplit crates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given name and content.
pub fn temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Writes `(relative path, contents)` pairs under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
    }
}

/// Every file under `root` as `(relative path, contents)`, sorted by path.
pub fn read_tree(root: &Path) -> BTreeMap<String, String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) {
        for entry in std::fs::read_dir(dir).expect("Failed to read directory") {
            let path = entry.expect("Failed to read entry").path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .expect("Path outside root")
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                let contents = std::fs::read_to_string(&path).expect("Failed to read file");
                out.insert(relative, contents);
            }
        }
    }

    let mut files = BTreeMap::new();
    walk(root, root, &mut files);
    files
}

/// A description that is stored in a sibling file.
pub fn long_description() -> String {
    let paragraph = "Provides a managed resource with a lot of behavior to explain. ";
    format!("{}\n\n## Example Usage\n\nSee the docs.\n", paragraph.repeat(8))
}

/// A small but complete package schema exercising every section.
pub fn sample_document() -> Value {
    json!({
        "name": "acme",
        "displayName": "Acme",
        "version": "2.1.0",
        "description": "A provider for Acme cloud resources.",
        "keywords": ["acme", "category/cloud"],
        "homepage": "https://example.com/acme",
        "license": "Apache-2.0",
        "meta": {"moduleFormat": "(.*)(?:/[^/]*)"},
        "config": {
            "variables": {
                "region": {"type": "string", "description": "The region to use."}
            },
            "defaults": ["region"]
        },
        "provider": {
            "description": "The provider type for the acme package.",
            "inputProperties": {"region": {"type": "string"}}
        },
        "language": {
            "nodejs": {"packageName": "@acme/acme", "dependencies": {"@pulumi/pulumi": "^3.0.0"}},
            "python": {"requires": {"pulumi": ">=3.0.0,<4.0.0"}},
            "csharp": {"namespaces": {"storage": "Storage"}}
        },
        "resources": {
            "acme:index:Provider": {"description": "Provider resource."},
            "acme:storage/bucket:Bucket": {
                "description": long_description(),
                "properties": {"arn": {"type": "string"}},
                "required": ["arn"]
            },
            "acme:storage/Object:Object": {
                "description": "An object in a bucket.",
                "inputProperties": {"bucket": {"type": "string"}}
            },
            "acme:compute/v1:Instance": {
                "properties": {"size": {"type": "integer", "default": 1}}
            }
        },
        "functions": {
            "acme:storage/getBucket:getBucket": {
                "inputs": {"properties": {"name": {"type": "string"}}},
                "outputs": {"properties": {"arn": {"type": "string"}}}
            }
        },
        "types": {
            "acme:storage/bucket:Versioning": {
                "type": "object",
                "properties": {"enabled": {"type": "boolean"}}
            },
            "acme:compute/v1:Size": {
                "type": "string",
                "enum": [{"value": "small"}, {"value": "large"}],
                "description": "x".repeat(401)
            }
        }
    })
}

/// A document with only metadata.
pub fn minimal_document() -> Value {
    json!({"name": "minimal", "version": "0.0.1"})
}

/// Serialized form of `value` as pretty JSON with a trailing newline.
pub fn to_json_text(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).expect("Failed to encode JSON");
    text.push('\n');
    text
}

/// Proptest strategies for generating schema documents.
pub mod strategies {
    use super::*;

    /// Strings a YAML reader could mistake for another scalar type.
    const YAML_LOOKALIKES: &[&str] = &[
        "yes", "no", "on", "off", "y", "n", "~", "null", "Null", "true", "False", "0x1F",
        "0o17", "012", "1e3", "1_000", ".5", "-", ".inf", "-.Inf", ".nan", "NaN", "",
    ];

    /// Leaf and shallow nested values that both JSON and YAML carry losslessly.
    pub fn payload_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            any::<u64>().prop_map(Value::from),
            any::<f64>()
                .prop_filter("finite", |f| f.is_finite())
                .prop_map(Value::from),
            "[a-zA-Z0-9 ._:/#'\"!&*{}\\[\\],-]{0,24}".prop_map(Value::String),
            prop::sample::select(YAML_LOOKALIKES).prop_map(|s| Value::String(s.to_string())),
        ];
        leaf.prop_recursive(2, 12, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z][a-zA-Z]{0,7}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    /// Short descriptions stay inline, long ones move to a sibling file.
    pub fn description() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            2 => Just(None),
            3 => "[a-zA-Z0-9 .,:#'\"-]{0,40}".prop_map(Some),
            1 => "[a-zA-Z0-9 .,\n]{395,520}".prop_map(Some),
        ]
    }

    /// One entity: an optional description plus opaque fields.
    pub fn entity() -> impl Strategy<Value = Value> {
        (
            description(),
            prop::collection::btree_map("[a-z][a-zA-Z]{0,7}", payload_value(), 0..4),
        )
            .prop_map(|(description, fields)| {
                let mut map: Map<String, Value> = fields.into_iter().collect();
                if let Some(description) = description {
                    map.insert("description".to_string(), Value::String(description));
                }
                Value::Object(map)
            })
    }

    #[derive(Debug, Clone)]
    enum Submodule {
        None,
        Distinct(String),
        SameAsName,
    }

    fn submodule() -> impl Strategy<Value = Submodule> {
        prop_oneof![
            Just(Submodule::None),
            "[a-z]{1,5}[0-9]".prop_map(Submodule::Distinct),
            Just(Submodule::SameAsName),
        ]
    }

    /// A token-addressed collection for package `provider` in which no two
    /// tokens land on the same file.
    pub fn collection(provider: String) -> impl Strategy<Value = Value> {
        prop::collection::vec(
            ("[a-z][a-z0-9]{0,5}", submodule(), "[A-Z][a-zA-Z]{0,8}", entity()),
            0..6,
        )
        .prop_map(move |entries| {
            let mut by_location = BTreeMap::new();
            for (module, submodule, name, entity) in entries {
                let (directory, module_path) = match submodule {
                    Submodule::None => (module.clone(), module),
                    Submodule::Distinct(sub) => (format!("{module}/{sub}"), format!("{module}/{sub}")),
                    Submodule::SameAsName => {
                        (module.clone(), format!("{module}/{}", name.to_lowercase()))
                    }
                };
                let token = format!("{provider}:{module_path}:{name}");
                by_location.entry((directory, name)).or_insert((token, entity));
            }
            Value::Object(by_location.into_values().collect())
        })
    }

    fn language() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-z][a-z0-9_-]{0,6}", payload_value(), 0..3)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    fn section() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-z][a-zA-Z]{0,7}", payload_value(), 0..3)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    /// A whole document with well-formed tokens and storable language names.
    pub fn document() -> impl Strategy<Value = Value> {
        "[a-z][a-z0-9]{0,7}".prop_flat_map(|name| {
            (
                Just(name.clone()),
                prop::option::of("[0-9]\\.[0-9]\\.[0-9]"),
                prop::option::of(section()),
                prop::option::of(section()),
                prop::option::of(language()),
                prop::option::of(collection(name.clone())),
                prop::option::of(collection(name.clone())),
                prop::option::of(collection(name)),
            )
                .prop_map(
                    |(name, version, config, provider, language, functions, resources, types)| {
                        let mut doc = Map::new();
                        doc.insert("name".into(), Value::String(name));
                        let optional = [
                            ("version", version.map(Value::String)),
                            ("config", config),
                            ("provider", provider),
                            ("language", language),
                            ("functions", functions),
                            ("resources", resources),
                            ("types", types),
                        ];
                        for (key, value) in optional {
                            if let Some(value) = value {
                                doc.insert(key.into(), value);
                            }
                        }
                        Value::Object(doc)
                    },
                )
        })
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
