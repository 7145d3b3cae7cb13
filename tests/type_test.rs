//! Integration tests for `type` keyword validation.

use checktree::{ValidationError, Validator};
use serde_json::{json, Value};

fn validator_for(schema: Value) -> Validator {
    Validator::new(&schema).unwrap()
}

/// One sample per runtime kind, plus an integral float.
fn samples() -> Vec<(&'static str, Value)> {
    vec![
        ("null", json!(null)),
        ("boolean", json!(true)),
        ("object", json!({"a": 1})),
        ("array", json!([1, 2])),
        ("number", json!(2.5)),
        ("string", json!("text")),
        ("integer", json!(7)),
    ]
}

fn accepts(kind: &str, sample_kind: &str) -> bool {
    kind == sample_kind
        // every integer is also a number
        || (kind == "number" && sample_kind == "integer")
}

#[test]
fn test_each_primitive_type_accepts_only_its_kind() {
    for kind in ["null", "boolean", "object", "array", "number", "string", "integer"] {
        let validator = validator_for(json!({ "type": kind }));
        for (sample_kind, sample) in samples() {
            let result = validator.validate(&sample);
            if accepts(kind, sample_kind) {
                assert!(result.is_ok(), "{} should accept {}", kind, sample);
            } else {
                let error: ValidationError = result.unwrap_err();
                assert_eq!(error.reason, format!("Not a {}", kind));
                assert_eq!(error.path, "root/type");
            }
        }
    }
}

#[test]
fn test_integer_accepts_integral_floats() {
    let validator = validator_for(json!({"type": "integer"}));
    assert!(validator.validate(&json!(3.0)).is_ok());
    assert!(validator.validate(&json!(-0.0)).is_ok());
    assert!(validator.validate(&json!(3.5)).is_err());
}

#[test]
fn test_null_is_present_but_only_null() {
    let validator = validator_for(json!({"type": "null"}));
    assert!(validator.validate(&json!(null)).is_ok());
    assert!(validator.validate(&json!(0)).is_err());
    assert!(validator.validate(&json!("")).is_err());
    assert!(validator.validate(&json!(false)).is_err());
}

#[test]
fn test_type_union() {
    let validator = validator_for(json!({"type": ["string", "integer"]}));
    assert!(validator.validate(&json!("x")).is_ok());
    assert!(validator.validate(&json!(3)).is_ok());

    let error = validator.validate(&json!(3.5)).unwrap_err();
    assert_eq!(error.path, "root/anyOf");
    assert_eq!(error.reason, "does not satisfy any check");

    assert!(validator.validate(&json!(null)).is_err());
}

#[test]
fn test_nullable_union() {
    let validator = validator_for(json!({"type": ["null", "array"], "maxItems": 1}));
    assert!(validator.validate(&json!(null)).is_ok());
    assert!(validator.validate(&json!([1])).is_ok());

    let error = validator.validate(&json!([1, 2])).unwrap_err();
    assert_eq!(error.path, "root/maxItems");
}

#[test]
fn test_duplicate_type_fails_compilation() {
    let error = Validator::new(&json!({"type": ["string", "string"]})).unwrap_err();
    assert_eq!(error.path, "root/type/1");
    assert_eq!(error.reason, "Duplicate type 'string'");
}

#[test]
fn test_malformed_type_fails_compilation() {
    assert!(Validator::new(&json!({"type": "float"})).is_err());
    assert!(Validator::new(&json!({"type": ["string", null]})).is_err());
    assert!(Validator::new(&json!({"type": {"name": "string"}})).is_err());
    assert!(Validator::new(&json!({"type": []})).is_err());
}
