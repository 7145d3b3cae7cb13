//! Run-time error for values that break a compiled rule.

use thiserror::Error;

use crate::path::JsonPath;

/// The first rule a value violated.
///
/// - **path**: schema path of the check that failed (e.g. `root/items/type`)
/// - **keyword**: schema keyword that produced the check (e.g. `type`)
/// - **location**: where inside the value the check failed (`[1]` for the
///   second array element, empty for the value itself)
/// - **reason**: human-readable description of the failure
///
/// # Example
///
/// ```rust
/// use checktree::Validator;
/// use serde_json::json;
///
/// let validator = Validator::new(&json!({"items": {"type": "integer"}})).unwrap();
/// let error = validator.validate(&json!([1, "x"])).unwrap_err();
///
/// assert_eq!(error.path, "root/items/type");
/// assert_eq!(error.keyword, "type");
/// assert_eq!(error.location.to_string(), "[1]");
/// assert_eq!(error.reason, "Not a integer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}{}", location_suffix(.location))]
pub struct ValidationError {
    /// Path of the check that failed.
    pub path: String,
    /// Keyword that produced the failing check.
    pub keyword: &'static str,
    /// Location of the offending element inside the validated value.
    pub location: JsonPath,
    /// Human-readable description of the failure.
    pub reason: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(
        path: impl Into<String>,
        keyword: &'static str,
        location: JsonPath,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            keyword,
            location,
            reason: reason.into(),
        }
    }
}

fn location_suffix(location: &JsonPath) -> String {
    if location.is_root() {
        String::new()
    } else {
        format!(" (at {})", location)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};
