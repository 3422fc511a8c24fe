//! Integration tests: compile schemas and run validation passes end to end.

use serde_json::{json, Value};
use shapeguard_schema::{
    Definition, Schema, SchemaError, ValidateOptions, ValidationFailed, ValueKind, ViolationKind,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn name_schema() -> Schema {
    Schema::from_json(&json!({"name": {"type": "string"}})).unwrap()
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_constructor_creates_properties() {
    let schema = name_schema();
    assert!(schema.props().contains_key("name"));
}

#[test]
fn test_path_creates_properties() {
    let mut schema = Schema::new();
    schema.path("name", Definition::typed(ValueKind::String)).unwrap();
    assert!(schema.props().contains_key("name"));
}

#[test]
fn test_path_supports_nested_properties() {
    let mut schema = Schema::new();
    schema
        .path_json("name", &json!({"first": {"type": "string"}}))
        .unwrap();
    assert!(schema.props().contains_key("name.first"));
    assert!(schema.get("name").unwrap().is_container());
}

#[test]
fn test_path_returns_the_property() {
    let mut schema = Schema::new();
    let prop = schema.path("name", Definition::typed(ValueKind::String)).unwrap();
    assert_eq!(prop.name(), "name");

    let nested = schema.path("address.city", Definition::new()).unwrap();
    assert_eq!(nested.name(), "city");
}

#[test]
fn test_malformed_definition_fails_at_registration() {
    let mut schema = Schema::new();
    let err = schema
        .path_json("name", &json!({"type": "string", "first": {}}))
        .unwrap_err();
    assert!(matches!(err, SchemaError::MixedDefinition { .. }));
    assert!(schema.is_empty());
}

#[test]
fn test_null_type_fails_at_registration() {
    let err = Schema::from_json(&json!({"a": {"type": "null", "required": true}})).unwrap_err();
    assert!(
        matches!(err, SchemaError::UnknownType { ref type_name, .. } if type_name == "null"),
        "expected UnknownType, got: {err}"
    );

    let mut schema = Schema::new();
    assert!(schema.path("a", Definition::typed(ValueKind::Null)).is_err());
    assert!(schema.is_empty());
}

// ---------------------------------------------------------------------------
// validate()
// ---------------------------------------------------------------------------

#[test]
fn test_validate_registers_nested_required() {
    let mut schema = Schema::new();
    schema
        .path_json("name", &json!({"first": {"required": true}}))
        .unwrap();
    let violations = schema.validate(&mut json!({}));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.violations()[0].path.as_str(), "name.first");
    assert_eq!(violations.violations()[0].kind, ViolationKind::RequiredMissing);
}

#[test]
fn test_validate_returns_type_mismatch() {
    let violations = name_schema().validate(&mut json!({"name": 123}));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.violations()[0].kind, ViolationKind::TypeMismatch);
    assert_eq!(violations.messages(), vec!["name must be a string"]);
}

#[test]
fn test_validate_strips_unknown_keys() {
    init_tracing();
    let mut obj = json!({"name": "name", "age": 23});
    let violations = name_schema().validate(&mut obj);
    assert!(violations.is_empty());
    assert_eq!(obj, json!({"name": "name"}));
}

#[test]
fn test_validate_with_strip_disabled_keeps_keys() {
    let mut obj = json!({"name": "name", "age": 23});
    name_schema().validate_with(&mut obj, &ValidateOptions::default().with_strip(false));
    assert_eq!(obj["age"], 23);
}

#[test]
fn test_strip_keeps_failing_registered_keys() {
    let mut obj = json!({"name": 123, "junk": true});
    let violations = name_schema().validate(&mut obj);
    assert_eq!(violations.len(), 1);
    assert_eq!(obj, json!({"name": 123}));
}

#[test]
fn test_strip_descends_into_containers() {
    let schema = Schema::from_json(&json!({
        "name": {"first": {"type": "string"}, "last": {"type": "string"}},
        "meta": {},
    }))
    .unwrap();
    let mut obj = json!({
        "name": {"first": "Ada", "middle": "B", "last": "Lovelace"},
        "meta": {"anything": {"goes": [1, 2]}},
        "extra": null,
    });
    schema.validate(&mut obj);
    assert_eq!(
        obj,
        json!({
            "name": {"first": "Ada", "last": "Lovelace"},
            "meta": {"anything": {"goes": [1, 2]}},
        })
    );
}

#[test]
fn test_strip_keeps_object_valued_leaf_whole() {
    let schema = Schema::from_json(&json!({
        "meta": {"type": "object"},
        "name": {"first": {"type": "string"}},
    }))
    .unwrap();
    let mut obj = json!({
        "meta": {"x": 1, "nested": {"y": [true]}},
        "name": {"first": "Ada", "nick": "A"},
    });
    let violations = schema.validate(&mut obj);
    assert!(violations.is_empty());
    assert_eq!(obj["meta"], json!({"x": 1, "nested": {"y": [true]}}));
    assert_eq!(obj["name"], json!({"first": "Ada"}));
}

#[test]
fn test_typecast_skips_leaves_under_absent_parent() {
    let schema = Schema::from_json(&json!({"name": {"first": {"type": "string"}}})).unwrap();
    let mut obj = json!({"name": 5});
    let violations =
        schema.validate_with(&mut obj, &ValidateOptions::default().with_typecast(true));
    assert!(violations.is_empty());
    assert_eq!(obj, json!({"name": 5}));
}

#[test]
fn test_typecast_before_validation() {
    init_tracing();
    let schema = name_schema();
    let mut obj = json!({"name": 123});
    let violations =
        schema.validate_with(&mut obj, &ValidateOptions::default().with_typecast(true));
    assert!(violations.is_empty());
    assert_eq!(obj, json!({"name": "123"}));
}

#[test]
fn test_typecast_failure_reports_type_mismatch() {
    let schema = Schema::from_json(&json!({"age": {"type": "number"}})).unwrap();
    let mut obj = json!({"age": "old"});
    let violations =
        schema.validate_with(&mut obj, &ValidateOptions::default().with_typecast(true));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.violations()[0].kind, ViolationKind::TypeMismatch);
    assert_eq!(obj["age"], "old");
}

#[test]
fn test_typecast_nested_leaf() {
    let schema = Schema::from_json(&json!({
        "profile": {"age": {"type": "number"}, "active": {"type": "boolean"}},
    }))
    .unwrap();
    let mut obj = json!({"profile": {"age": "42", "active": "true"}});
    let violations =
        schema.validate_with(&mut obj, &ValidateOptions::default().with_typecast(true));
    assert!(violations.is_empty(), "unexpected: {violations}");
    assert_eq!(obj, json!({"profile": {"age": 42, "active": true}}));
}

#[test]
fn test_absent_intermediate_yields_absent_leaves() {
    let schema = Schema::from_json(&json!({
        "name": {"first": {"required": true}, "last": {"type": "string"}},
    }))
    .unwrap();
    let violations = schema.validate(&mut json!({"name": "not an object"}));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations.violations()[0].path.as_str(), "name.first");
}

#[test]
fn test_violations_follow_definition_order() {
    let schema = Schema::from_json(&json!({
        "b": {"required": true},
        "a": {"x": {"required": true}, "y": {"type": "number"}},
        "c": {"type": "boolean"},
    }))
    .unwrap();
    let mut obj = json!({"a": {"y": "no"}, "c": "no"});
    let paths: Vec<String> = schema
        .validate(&mut obj)
        .iter()
        .map(|v| v.path.to_string())
        .collect();
    assert_eq!(paths, vec!["b", "a.x", "a.y", "c"]);
}

#[test]
fn test_custom_validator_and_message() {
    let mut schema = Schema::new();
    schema
        .path(
            "email",
            Definition::typed(ValueKind::String)
                .required(true)
                .validate(|v: &Value| v.as_str().is_some_and(|s| s.contains('@'))),
        )
        .unwrap();
    schema
        .path(
            "age",
            Definition::new().validate(|v: &Value| match v.as_u64() {
                Some(n) if n < 150 => Ok(()),
                _ => Err("age is implausible".to_string()),
            }),
        )
        .unwrap();
    schema
        .path(
            "nick",
            Definition::typed(ValueKind::String).message("nick must be text"),
        )
        .unwrap();

    let mut obj = json!({"email": "nope", "age": 900, "nick": 1});
    let violations = schema.validate(&mut obj);
    assert_eq!(
        violations.messages(),
        vec!["email failed validation", "age is implausible", "nick must be text"]
    );
    assert!(violations
        .iter()
        .take(2)
        .all(|v| v.kind == ViolationKind::CustomValidationFailed));
}

#[test]
fn test_custom_type_tag() {
    let mut schema = Schema::new();
    let guid = shapeguard_schema::TypeTag::custom("guid", |v: &Value| {
        v.as_str().is_some_and(|s| s.len() == 36 && s.matches('-').count() == 4)
    });
    schema.path("id", Definition::typed(guid)).unwrap();

    assert!(schema
        .validate(&mut json!({"id": "123e4567-e89b-12d3-a456-426614174000"}))
        .is_empty());
    let violations = schema.validate(&mut json!({"id": "nope"}));
    assert_eq!(violations.messages(), vec!["id must be a guid"]);
}

#[test]
fn test_validate_non_object_input() {
    let schema = Schema::from_json(&json!({"name": {"required": true}})).unwrap();
    let mut input = json!([1, 2, 3]);
    let violations = schema.validate(&mut input);
    assert_eq!(violations.len(), 1);
    assert_eq!(input, json!([1, 2, 3]));
}

#[test]
fn test_options_loaded_from_config() {
    let options: ValidateOptions =
        serde_json::from_value(json!({"strip": false, "typecast": true})).unwrap();
    let mut obj = json!({"name": 7, "extra": 1});
    let violations = name_schema().validate_with(&mut obj, &options);
    assert!(violations.is_empty());
    assert_eq!(obj, json!({"name": "7", "extra": 1}));
}

// ---------------------------------------------------------------------------
// assert()
// ---------------------------------------------------------------------------

#[test]
fn test_assert_fails_when_validation_fails() {
    let err = name_schema().assert(&mut json!({"name": 123})).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("failed"), "got: {message}");
    assert!(message.contains("name must be a string"));
    assert_eq!(err.violations().len(), 1);
}

#[test]
fn test_assert_passes_on_valid_object() {
    let mut obj = json!({"name": "Ada", "age": 36});
    name_schema().assert(&mut obj).unwrap();
    assert_eq!(obj, json!({"name": "Ada"}));
}

#[test]
fn test_assert_carries_every_violation() {
    let schema = Schema::from_json(&json!({
        "a": {"required": true},
        "b": {"required": true},
        "c": {"type": "array"},
    }))
    .unwrap();
    let err: ValidationFailed = schema
        .assert_with(&mut json!({"c": 1}), &ValidateOptions::default())
        .unwrap_err();
    let violations = err.into_violations();
    assert_eq!(violations.len(), 3);
}
