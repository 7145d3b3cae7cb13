//! Tests for sharing one compiled validator across threads.

use checktree::Validator;
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {"type": "integer", "minimum": 0},
        "uniqueItems": true,
        "maxItems": 50
    })
}

#[test]
fn test_concurrent_validation() {
    let validator = Arc::new(Validator::new(&schema()).unwrap());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let values: Vec<i64> = (0..=i).collect();
                assert!(validator.validate(&json!(values)).is_ok());

                let error = validator.validate(&json!([i, i])).unwrap_err();
                assert_eq!(error.keyword, "uniqueItems");
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_cloned_validators_across_threads() {
    let validator = Validator::new(&json!({"pattern": "^[a-z]+$"})).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let validator = validator.clone();
            thread::spawn(move || {
                let word = "abcdefgh"[..=i].to_string();
                assert!(validator.is_valid(&json!(word)));
                assert!(!validator.is_valid(&json!(word.to_uppercase())));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_validate_many_matches_sequential() {
    let validator = Validator::new(&schema()).unwrap();
    let values: Vec<_> = (0..200)
        .map(|n| match n % 4 {
            0 => json!([n, n + 1]),
            1 => json!([n, n]),
            2 => json!([-n - 1]),
            _ => json!("not an array"),
        })
        .collect();

    let parallel = validator.validate_many(&values);
    let sequential: Vec<_> = values.iter().map(|v| validator.validate(v)).collect();
    assert_eq!(parallel, sequential);
}
