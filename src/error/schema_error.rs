//! Compile-time error for malformed schemas.

use thiserror::Error;

/// A schema keyword could not be compiled.
///
/// `path` locates the offending keyword inside the schema (for example
/// `root/items/0/type`), `reason` says what was wrong with it. Compilation
/// stops at the first such error; no partial validator is returned.
///
/// # Example
///
/// ```rust
/// use checktree::Validator;
/// use serde_json::json;
///
/// let error = Validator::new(&json!({"type": "text"})).unwrap_err();
///
/// assert_eq!(error.path, "root/type");
/// assert_eq!(error.to_string(), "root/type: Unknown type 'text'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct SchemaError {
    /// Path of the schema fragment that failed to compile.
    pub path: String,
    /// Human-readable description of the problem.
    pub reason: String,
}

impl SchemaError {
    /// Creates a new schema error at the given schema path.
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_creation() {
        let error = SchemaError::new("root/minLength", "minLength must be a non-negative integer");

        assert_eq!(error.path, "root/minLength");
        assert_eq!(error.reason, "minLength must be a non-negative integer");
    }

    #[test]
    fn test_schema_error_display() {
        let error = SchemaError::new("root/items/1", "Schema must be an object");
        assert_eq!(error.to_string(), "root/items/1: Schema must be an object");
    }
}
