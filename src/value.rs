//! Value model helpers over `serde_json::Value`.
//!
//! `serde_json` supplies the tagged union itself. This module adds what the
//! checks need on top of it: the seven schema kinds, exact numeric
//! comparison across integer and float representations, and the structural
//! equality shared by `const`, `enum` and `uniqueItems`.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde_json::{Number, Value};
use thiserror::Error;

/// A primitive kind that a `type` keyword can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    /// A number without a fractional part (`3` and `3.0` both qualify).
    Integer,
}

/// Returned when a `type` keyword names something other than the seven kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown type '{0}'")]
pub struct UnknownKind(pub String);

impl ValueKind {
    /// All kinds, in the order the schema dialect lists them.
    pub const ALL: [ValueKind; 7] = [
        ValueKind::Null,
        ValueKind::Boolean,
        ValueKind::Object,
        ValueKind::Array,
        ValueKind::Number,
        ValueKind::String,
        ValueKind::Integer,
    ];

    /// Returns the schema name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
        }
    }

    /// Returns true if `value` is of this kind.
    ///
    /// `Null` accepts only the null value; every other kind rejects it.
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (ValueKind::Null, Value::Null) => true,
            (ValueKind::Boolean, Value::Bool(_)) => true,
            (ValueKind::Object, Value::Object(_)) => true,
            (ValueKind::Array, Value::Array(_)) => true,
            (ValueKind::Number, Value::Number(_)) => true,
            (ValueKind::String, Value::String(_)) => true,
            (ValueKind::Integer, Value::Number(n)) => is_integral(n),
            _ => false,
        }
    }
}

impl FromStr for ValueKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownKind(name.to_string()))
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the runtime kind name of a value.
///
/// Numbers always report `number`; `integer` is a refinement, not a kind a
/// value carries on its own.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A JSON number split by representation.
#[derive(Clone, Copy)]
enum Num {
    Int(i128),
    Float(f64),
}

impl From<&Number> for Num {
    fn from(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Num::Int(i128::from(i))
        } else if let Some(u) = n.as_u64() {
            Num::Int(i128::from(u))
        } else {
            Num::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

// 2^64: every i64 and u64 lies strictly inside (-LIMIT, LIMIT).
const INT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Returns true if the number has no fractional part.
pub fn is_integral(n: &Number) -> bool {
    match Num::from(n) {
        Num::Int(_) => true,
        Num::Float(f) => f.is_finite() && f.fract() == 0.0,
    }
}

/// Returns the exact integer value of a number, if it has one within the
/// i64/u64 range. Integral floats such as `4.0` are included.
pub(crate) fn as_integer(n: &Number) -> Option<i128> {
    match Num::from(n) {
        Num::Int(i) => Some(i),
        Num::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < INT_LIMIT => {
            Some(f as i128)
        }
        Num::Float(_) => None,
    }
}

/// Compares two numbers exactly.
///
/// Integers are never routed through `f64`, so `2^63 + 1` and `2^63` stay
/// distinct, while `1` and `1.0` compare equal.
pub fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (Num::from(a), Num::from(b)) {
        (Num::Int(x), Num::Int(y)) => x.cmp(&y),
        (Num::Float(x), Num::Float(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Num::Int(x), Num::Float(y)) => compare_int_float(x, y),
        (Num::Float(x), Num::Int(y)) => compare_int_float(y, x).reverse(),
    }
}

fn compare_int_float(int: i128, float: f64) -> Ordering {
    if float >= INT_LIMIT {
        return Ordering::Less;
    }
    if float <= -INT_LIMIT {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => whole.partial_cmp(&float).unwrap_or(Ordering::Equal),
        ordering => ordering,
    }
}

/// Structural equality over values.
///
/// Arrays compare element-wise in order, objects by key set and per-key
/// value, numbers exactly (`1 == 1.0`), strings by content. There is no
/// coercion between kinds: `5` and `"5"` are different.
///
/// # Example
///
/// ```rust
/// use checktree::value::equal;
/// use serde_json::json;
///
/// assert!(equal(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
/// assert!(!equal(&json!([1, 2]), &json!([2, 1])));
/// assert!(!equal(&json!(5), &json!("5")));
/// ```
pub fn equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Ordering::Equal,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| equal(x, y)))
        }
        _ => false,
    }
}

/// Returns a text key such that two values are [`equal`] exactly when their
/// keys are identical.
///
/// Object keys are sorted and integral numbers are printed as integers, so
/// `{"b": 1.0, "a": 2}` and `{"a": 2, "b": 1}` share a key.
pub fn canonical_key(value: &Value) -> String {
    Canonical(value).to_string()
}

struct Canonical<'a>(&'a Value);

impl Display for Canonical<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => match as_integer(n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{:?}", n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", Canonical(item))?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                f.write_str("{")?;
                for (i, (key, item)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:?}:{}", key, Canonical(item))?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(value: Value) -> Number {
        match value {
            Value::Number(n) => n,
            other => panic!("not a number: {}", other),
        }
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ValueKind::ALL {
            assert_eq!(kind.name().parse::<ValueKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "text".parse::<ValueKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown type 'text'");
    }

    #[test]
    fn test_integer_kind_accepts_integral_floats() {
        assert!(ValueKind::Integer.matches(&json!(3)));
        assert!(ValueKind::Integer.matches(&json!(3.0)));
        assert!(ValueKind::Integer.matches(&json!(-7)));
        assert!(ValueKind::Integer.matches(&json!(u64::MAX)));
        assert!(!ValueKind::Integer.matches(&json!(3.5)));
        assert!(!ValueKind::Integer.matches(&json!("3")));
    }

    #[test]
    fn test_null_kind_only_matches_null() {
        assert!(ValueKind::Null.matches(&Value::Null));
        assert!(!ValueKind::Null.matches(&json!(false)));
        assert!(!ValueKind::Null.matches(&json!(0)));
        assert!(!ValueKind::String.matches(&Value::Null));
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!(1)), "number");
        assert_eq!(kind_name(&json!(1.5)), "number");
        assert_eq!(kind_name(&json!([])), "array");
        assert_eq!(kind_name(&json!({})), "object");
    }

    #[test]
    fn test_compare_numbers_mixed_representations() {
        assert_eq!(compare_numbers(&number(json!(1)), &number(json!(1.0))), Ordering::Equal);
        assert_eq!(compare_numbers(&number(json!(1)), &number(json!(1.5))), Ordering::Less);
        assert_eq!(compare_numbers(&number(json!(2)), &number(json!(1.5))), Ordering::Greater);
        assert_eq!(compare_numbers(&number(json!(-2)), &number(json!(-1.5))), Ordering::Less);
        assert_eq!(compare_numbers(&number(json!(-1)), &number(json!(-1.5))), Ordering::Greater);
        assert_eq!(compare_numbers(&number(json!(u64::MAX)), &number(json!(1e30))), Ordering::Less);
        assert_eq!(compare_numbers(&number(json!(i64::MIN)), &number(json!(-1e30))), Ordering::Greater);
    }

    #[test]
    fn test_compare_numbers_large_integers_stay_exact() {
        let a = number(json!(9_007_199_254_740_993_u64));
        let b = number(json!(9_007_199_254_740_992_u64));
        assert_eq!(compare_numbers(&a, &b), Ordering::Greater);
        assert_eq!(compare_numbers(&number(json!(u64::MAX)), &number(json!(-1))), Ordering::Greater);
    }

    #[test]
    fn test_equal_is_structural() {
        assert!(equal(&json!(null), &json!(null)));
        assert!(equal(&json!(1), &json!(1.0)));
        assert!(equal(&json!({"a": 1, "b": [true]}), &json!({"b": [true], "a": 1})));
        assert!(!equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!equal(&json!({"a": 1}), &json!({"b": 1})));
        assert!(!equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!equal(&json!([1]), &json!([1, 1])));
        assert!(!equal(&json!(5), &json!("5")));
        assert!(!equal(&json!(0), &json!(false)));
        assert!(!equal(&json!(null), &json!(0)));
    }

    #[test]
    fn test_canonical_key_agrees_with_equal() {
        let pairs = [
            (json!(1), json!(1.0)),
            (json!({"b": 1.0, "a": 2}), json!({"a": 2, "b": 1})),
            (json!([1, "x", null]), json!([1.0, "x", null])),
            (json!(-0.0), json!(0)),
        ];
        for (a, b) in &pairs {
            assert!(equal(a, b));
            assert_eq!(canonical_key(a), canonical_key(b));
        }

        let distinct = [
            (json!(1), json!("1")),
            (json!([1, 2]), json!([2, 1])),
            (json!(1.5), json!(1)),
            (json!({"a": null}), json!({})),
            (json!("a,b"), json!(["a", "b"])),
        ];
        for (a, b) in &distinct {
            assert!(!equal(a, b));
            assert_ne!(canonical_key(a), canonical_key(b));
        }
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(as_integer(&number(json!(4.0))), Some(4));
        assert_eq!(as_integer(&number(json!(-4))), Some(-4));
        assert_eq!(as_integer(&number(json!(4.5))), None);
        assert_eq!(as_integer(&number(json!(1e30))), None);
    }
}
