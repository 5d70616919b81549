/// Integration tests covering compile + validate end to end on complete
/// schema/instance pairs, one per JTD form.
use jtd_core::{compile, validate};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeSet;

fn errors_as_set(schema: &serde_json::Value, instance: &serde_json::Value) -> BTreeSet<(String, String)> {
    let root = compile(schema).expect("schema should compile");
    validate(&root, instance)
        .into_iter()
        .map(|e| (e.instance_path, e.schema_path))
        .collect()
}

#[test]
fn empty_schema_accepts_anything() {
    let schema = json!({});
    for instance in [json!(null), json!(1), json!("x"), json!([1, 2]), json!({"a": 1})] {
        assert!(errors_as_set(&schema, &instance).is_empty());
    }
}

#[test]
fn type_mismatch_reports_root_paths() {
    let schema = json!({"type": "string"});
    let errors = errors_as_set(&schema, &json!(42));
    assert_eq!(errors, BTreeSet::from([("".to_string(), "/type".to_string())]));
}

#[test]
fn enum_rejects_value_outside_set() {
    let schema = json!({"enum": ["A", "B"]});
    assert!(errors_as_set(&schema, &json!("A")).is_empty());
    let errors = errors_as_set(&schema, &json!("C"));
    assert_eq!(errors, BTreeSet::from([("".to_string(), "/enum".to_string())]));
}

#[test]
fn elements_validates_each_item_with_its_own_path() {
    let schema = json!({"elements": {"type": "uint8"}});
    let errors = errors_as_set(&schema, &json!([1, 300, 3, -1]));
    assert_eq!(
        errors,
        BTreeSet::from([
            ("/1".to_string(), "/elements/type".to_string()),
            ("/3".to_string(), "/elements/type".to_string()),
        ])
    );
}

#[test]
fn properties_scenario_reports_missing_required_and_rejects_unknown() {
    let schema = json!({
        "properties": {"name": {"type": "string"}},
        "optionalProperties": {"age": {"type": "uint8"}},
    });
    let instance = json!({"age": 30, "extra": true});
    let errors = errors_as_set(&schema, &instance);
    assert_eq!(
        errors,
        BTreeSet::from([
            ("".to_string(), "/properties/name".to_string()),
            ("/extra".to_string(), "".to_string()),
        ])
    );
}

#[test]
fn values_validates_every_member_with_shared_schema() {
    let schema = json!({"values": {"type": "boolean"}});
    let errors = errors_as_set(&schema, &json!({"a": true, "b": 1}));
    assert_eq!(
        errors,
        BTreeSet::from([("/b".to_string(), "/values/type".to_string())])
    );
}

#[test]
fn discriminator_scenario() {
    let schema = json!({
        "discriminator": "kind",
        "mapping": {
            "circle": {"properties": {"radius": {"type": "float64"}}},
            "square": {"properties": {"side": {"type": "float64"}}},
        }
    });
    assert!(errors_as_set(&schema, &json!({"kind": "circle", "radius": 1.0})).is_empty());

    let missing_tag = errors_as_set(&schema, &json!({"radius": 1.0}));
    assert_eq!(
        missing_tag,
        BTreeSet::from([("".to_string(), "/discriminator".to_string())])
    );

    let bad_tag = errors_as_set(&schema, &json!({"kind": "triangle"}));
    assert_eq!(
        bad_tag,
        BTreeSet::from([("/kind".to_string(), "/mapping".to_string())])
    );
}

#[test]
fn nullable_accepts_null_and_mirrors_inner_errors() {
    let schema = json!({"type": "string", "nullable": true});
    assert!(errors_as_set(&schema, &json!(null)).is_empty());
    let errors = errors_as_set(&schema, &json!(1));
    assert_eq!(errors, BTreeSet::from([("".to_string(), "/type".to_string())]));
}

#[test]
fn recursive_ref_terminates_on_finite_instance() {
    let schema = json!({
        "definitions": {
            "node": {
                "optionalProperties": {"next": {"ref": "node", "nullable": true}},
            }
        },
        "ref": "node",
    });
    let instance = json!({"next": {"next": null}});
    assert!(errors_as_set(&schema, &instance).is_empty());
}

#[test]
fn recursive_ref_without_base_case_reports_missing_leaf() {
    let schema = json!({
        "definitions": {"node": {"properties": {"next": {"ref": "node"}}}},
        "ref": "node",
    });
    let instance = json!({"next": {"next": {}}});
    let errors = errors_as_set(&schema, &instance);
    assert_eq!(
        errors,
        BTreeSet::from([(
            "/next/next".to_string(),
            "/properties/next/properties/next/properties/next".to_string()
        )])
    );
}

#[test]
fn error_accumulation_does_not_short_circuit() {
    let schema = json!({"properties": {"a": {"type": "string"}, "b": {"type": "string"}}});
    let errors = errors_as_set(&schema, &json!({"a": 1, "b": 2}));
    assert_eq!(errors.len(), 2);
}
