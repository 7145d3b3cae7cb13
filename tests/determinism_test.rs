//! Property tests for deterministic validation and structural equality.

use checktree::value::{canonical_key, equal};
use checktree::Validator;
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1000.0f64..1000.0).prop_map(|f| json!(f)),
        "[a-z0-9]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..3)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn validator() -> Validator {
    Validator::new(&json!({
        "type": ["array", "integer", "string"],
        "minimum": -50,
        "maxLength": 4,
        "pattern": "^[a-m0-9]*$",
        "items": {"type": ["object", "array", "null", "boolean"]},
        "uniqueItems": true
    }))
    .unwrap()
}

proptest! {
    #[test]
    fn test_validation_is_deterministic(value in arb_json()) {
        let validator = validator();
        let first = validator.validate(&value);
        let second = validator.validate(&value);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_recompiling_gives_same_results(value in arb_json()) {
        prop_assert_eq!(validator().validate(&value), validator().validate(&value));
    }

    #[test]
    fn test_validate_many_agrees_with_validate(values in prop::collection::vec(arb_json(), 0..16)) {
        let validator = validator();
        let parallel = validator.validate_many(&values);
        let sequential: Vec<_> = values.iter().map(|v| validator.validate(v)).collect();
        prop_assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_equal_is_reflexive(value in arb_json()) {
        prop_assert!(equal(&value, &value));
    }

    #[test]
    fn test_canonical_key_agrees_with_equal(a in arb_json(), b in arb_json()) {
        prop_assert_eq!(equal(&a, &b), canonical_key(&a) == canonical_key(&b));
        prop_assert_eq!(equal(&a, &b), equal(&b, &a));
    }

    #[test]
    fn test_repeated_element_breaks_unique_items(
        mut items in prop::collection::vec(arb_json(), 1..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let validator = Validator::new(&json!({"uniqueItems": true})).unwrap();
        let duplicate = items[pick.index(items.len())].clone();
        items.push(duplicate);

        let error = validator.validate(&Value::Array(items)).unwrap_err();
        prop_assert_eq!(error.keyword, "uniqueItems");
    }

    #[test]
    fn test_enum_accepts_its_members(items in prop::collection::vec(arb_json(), 0..6)) {
        let validator = Validator::new(&json!({ "enum": items.clone() })).unwrap();
        for item in &items {
            prop_assert!(validator.is_valid(item));
        }
    }
}
