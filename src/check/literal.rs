//! `type`, `enum` and `const` evaluation.

use indexmap::IndexMap;
use serde_json::Value;

use super::fail;
use crate::error::ValidationError;
use crate::path::JsonPath;
use crate::value::{canonical_key, equal, ValueKind};

pub(super) fn check_type(
    path: &str,
    kind: ValueKind,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    if kind.matches(value) {
        Ok(())
    } else {
        fail(path, "type", location, format!("Not a {}", kind))
    }
}

pub(super) fn check_enum(
    path: &str,
    allowed: &IndexMap<String, Value>,
    null_allowed: bool,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let member = match value {
        Value::Null => null_allowed,
        _ => allowed.contains_key(&canonical_key(value)),
    };
    if member {
        Ok(())
    } else {
        fail(path, "enum", location, "Value is outside of enumeration")
    }
}

pub(super) fn check_const(
    path: &str,
    literal: &Value,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    if equal(literal, value) {
        Ok(())
    } else {
        fail(path, "const", location, "Value does not match const")
    }
}
