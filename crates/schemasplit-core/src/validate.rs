//! Structural validation of schema documents.
//!
//! The engine itself only needs well-formed tokens; a [`Validator`] is the
//! seam where callers plug in stricter checks. [`StructuralValidator`] covers
//! the shape of the document without knowing anything about the payloads.

use serde_json::{Map, Value};

use schemasplit_common_core::{Error, Result, Violation};

use crate::layout::is_language_name;
use crate::schema::EntityKind;
use crate::token::Token;

/// Checks a document and reports every problem found.
pub trait Validator {
    fn validate(&self, document: &Value) -> std::result::Result<(), Vec<Violation>>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> std::result::Result<(), Vec<Violation>>,
{
    fn validate(&self, document: &Value) -> std::result::Result<(), Vec<Violation>> {
        self(document)
    }
}

/// Run `validator`, turning its complaints into [`Error::Validation`].
pub fn validate_with<V: Validator + ?Sized>(validator: &V, document: &Value) -> Result<()> {
    validator
        .validate(document)
        .map_err(|violations| Error::Validation { violations })
}

const STRING_FIELDS: &[&str] = &[
    "version",
    "description",
    "displayName",
    "homepage",
    "license",
    "repository",
    "publisher",
];

/// Shape checks for the top-level document, its collections and sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl Validator for StructuralValidator {
    fn validate(&self, document: &Value) -> std::result::Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        let Some(root) = document.as_object() else {
            return Err(vec![Violation::new("", "document must be a mapping")]);
        };

        match root.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {}
            Some(Value::String(_)) => violations.push(Violation::new("/name", "must not be empty")),
            Some(_) => violations.push(Violation::new("/name", "must be a string")),
            None => violations.push(Violation::new("/name", "is required")),
        }

        for field in STRING_FIELDS {
            if let Some(value) = root.get(*field) {
                if !value.is_string() {
                    violations.push(Violation::new(format!("/{field}"), "must be a string"));
                }
            }
        }

        if let Some(keywords) = root.get("keywords") {
            match keywords.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_string() {
                            violations
                                .push(Violation::new(format!("/keywords/{i}"), "must be a string"));
                        }
                    }
                }
                None => violations.push(Violation::new("/keywords", "must be a list")),
            }
        }

        for section in ["config", "provider"] {
            check_mapping(root, section, &mut violations);
        }

        if let Some(language) = check_mapping(root, "language", &mut violations) {
            for name in language.keys() {
                if !is_language_name(name) {
                    violations.push(Violation::new(
                        format!("/language/{name}"),
                        "language name must start with a letter and contain only letters, digits, `_` or `-`",
                    ));
                }
            }
        }

        for kind in EntityKind::ALL {
            if let Some(collection) = check_mapping(root, kind.as_str(), &mut violations) {
                check_collection(kind, collection, &mut violations);
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Null counts as absent.
fn check_mapping<'a>(
    root: &'a Map<String, Value>,
    field: &str,
    violations: &mut Vec<Violation>,
) -> Option<&'a Map<String, Value>> {
    match root.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            violations.push(Violation::new(format!("/{field}"), "must be a mapping"));
            None
        }
    }
}

fn check_collection(kind: EntityKind, collection: &Map<String, Value>, violations: &mut Vec<Violation>) {
    for (token, entity) in collection {
        let path = format!("/{kind}/{token}");
        if let Err(e) = Token::parse(token) {
            violations.push(Violation::new(path.as_str(), e.to_string()));
        }
        match entity {
            Value::Object(fields) => {
                if let Some(description) = fields.get("description") {
                    if !description.is_string() {
                        violations.push(Violation::new(
                            format!("{path}/description"),
                            "must be a string",
                        ));
                    }
                }
            }
            _ => violations.push(Violation::new(path, "must be a mapping")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(document: Value) -> Vec<String> {
        match StructuralValidator.validate(&document) {
            Ok(()) => Vec::new(),
            Err(violations) => violations.into_iter().map(|v| v.path).collect(),
        }
    }

    #[test]
    fn test_valid_document() {
        let doc = json!({
            "name": "pkg",
            "version": "1.0.0",
            "keywords": ["a", "b"],
            "config": {},
            "language": {"nodejs": {}, "my-lang_2": {}},
            "resources": {"pkg:index:Foo": {"description": "x"}},
            "types": {},
            "functions": null
        });
        assert!(paths(doc).is_empty());
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(paths(json!({})), vec!["/name"]);
        assert_eq!(paths(json!({"name": ""})), vec!["/name"]);
        assert_eq!(paths(json!({"name": 3})), vec!["/name"]);
    }

    #[test]
    fn test_non_mapping_document() {
        let err = StructuralValidator.validate(&json!([1])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].to_string(), "/: document must be a mapping");
    }

    #[test]
    fn test_metadata_types() {
        let doc = json!({"name": "pkg", "version": 1, "keywords": ["a", 2], "homepage": []});
        assert_eq!(paths(doc), vec!["/version", "/homepage", "/keywords/1"]);

        let doc = json!({"name": "pkg", "keywords": "a"});
        assert_eq!(paths(doc), vec!["/keywords"]);
    }

    #[test]
    fn test_sections_must_be_mappings() {
        let doc = json!({"name": "pkg", "config": [], "provider": "p", "types": 1});
        assert_eq!(paths(doc), vec!["/config", "/provider", "/types"]);
    }

    #[test]
    fn test_collection_entries() {
        let doc = json!({
            "name": "pkg",
            "resources": {
                "bad": {},
                "pkg:index:NotMap": [],
                "pkg:index:BadDesc": {"description": 5}
            }
        });
        assert_eq!(
            paths(doc),
            vec![
                "/resources/bad",
                "/resources/pkg:index:BadDesc/description",
                "/resources/pkg:index:NotMap",
            ]
        );
    }

    #[test]
    fn test_language_names() {
        let doc = json!({"name": "pkg", "language": {"a.b": {}, "ok": {}}});
        assert_eq!(paths(doc), vec!["/language/a.b"]);
    }

    #[test]
    fn test_validate_with_maps_error() {
        let err = validate_with(&StructuralValidator, &json!({})).unwrap_err();
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn test_closure_validator() {
        let reject_all = |_: &Value| -> std::result::Result<(), Vec<Violation>> {
            Err(vec![Violation::new("/x", "nope")])
        };
        let err = validate_with(&reject_all, &json!({"name": "pkg"})).unwrap_err();
        assert_eq!(err.violations()[0].message, "nope");

        let accept_all = |_: &Value| -> std::result::Result<(), Vec<Violation>> { Ok(()) };
        assert!(validate_with(&accept_all, &json!(null)).is_ok());
    }
}
