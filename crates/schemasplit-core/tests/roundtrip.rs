//! Round-trip properties over generated documents.

use proptest::prelude::*;
use serde_json::Value;

use schemasplit_common_fs::MemoryTree;
use schemasplit_core::{explode, implode, normalize, verify_roundtrip, Format, SchemaDocument};
use schemasplit_test_utils::{sample_document, strategies};

fn parse(value: Value) -> SchemaDocument {
    serde_json::from_value(value).unwrap()
}

fn format() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Json), Just(Format::Yaml)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn implode_inverts_explode(value in strategies::document(), format in format()) {
        let doc = parse(value.clone());
        let mut tree = MemoryTree::new();
        explode(&doc, format, &mut tree).unwrap();

        let restored = implode(&tree).unwrap();
        prop_assert_eq!(normalize(&restored).unwrap(), value);
    }

    #[test]
    fn explode_is_deterministic(value in strategies::document(), format in format()) {
        let doc = parse(value);
        let mut first = MemoryTree::new();
        let mut second = MemoryTree::new();
        explode(&doc, format, &mut first).unwrap();
        explode(&doc, format, &mut second).unwrap();
        prop_assert_eq!(first.files(), second.files());
    }

    #[test]
    fn re_exploding_an_imploded_tree_is_stable(value in strategies::document(), format in format()) {
        let doc = parse(value);
        let mut first = MemoryTree::new();
        explode(&doc, format, &mut first).unwrap();

        let mut second = MemoryTree::new();
        explode(&implode(&first).unwrap(), format, &mut second).unwrap();
        prop_assert_eq!(first.files(), second.files());
    }

    #[test]
    fn every_entity_file_carries_its_token(value in strategies::document()) {
        let doc = parse(value);
        let mut tree = MemoryTree::new();
        explode(&doc, Format::Json, &mut tree).unwrap();

        for (path, contents) in tree.files() {
            if path.contains('/') && path.ends_with(".json") {
                let stored: Value = serde_json::from_str(contents).unwrap();
                prop_assert!(stored.get("$token").and_then(Value::as_str).is_some(), "{}", path);
            }
        }
    }
}

#[test]
fn sample_document_round_trips_in_both_formats() {
    let doc = parse(sample_document());
    for format in Format::ALL {
        let report = verify_roundtrip(&doc, format).unwrap();
        assert!(report.is_identical(), "{format}: {:?}", report.differences);
    }
}

#[test]
fn json_and_yaml_trees_implode_to_the_same_document() {
    let doc = parse(sample_document());
    let mut json = MemoryTree::new();
    let mut yaml = MemoryTree::new();
    explode(&doc, Format::Json, &mut json).unwrap();
    explode(&doc, Format::Yaml, &mut yaml).unwrap();

    assert_eq!(implode(&json).unwrap(), implode(&yaml).unwrap());
}

#[test]
fn float_payloads_survive_both_formats() {
    for literal in [
        "9.999999999999999e-290",
        "3e-300",
        "1.2345678901234567e-250",
        "4.9406564584124654e-300",
        "18446744073709551615",
        "-0.5",
    ] {
        let text = format!(r#"{{"name": "pkg", "types": {{"pkg:index:T": {{"default": {literal}}}}}}}"#);
        let value: Value = Format::Json.decode(&text).unwrap();
        let doc = parse(value.clone());

        for format in Format::ALL {
            let mut tree = MemoryTree::new();
            explode(&doc, format, &mut tree).unwrap();
            let restored = normalize(&implode(&tree).unwrap()).unwrap();
            assert_eq!(restored, value, "{literal} via {format}");

            let report = verify_roundtrip(&doc, format).unwrap();
            assert!(report.is_identical(), "{literal} via {format}: {:?}", report.differences);
        }
    }
}

#[test]
fn in_memory_floats_survive_json_trees() {
    let value = serde_json::json!({
        "name": "pkg",
        "types": {"pkg:index:T": {"default": 3e-300, "max": f64::MAX, "min": f64::MIN_POSITIVE}}
    });
    let mut tree = MemoryTree::new();
    explode(&parse(value.clone()), Format::Json, &mut tree).unwrap();
    assert_eq!(normalize(&implode(&tree).unwrap()).unwrap(), value);
}
