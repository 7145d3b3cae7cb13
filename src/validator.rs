//! The public validation entry point.
//!
//! A [`Validator`] owns one compiled check tree. Compile once, then call
//! [`Validator::validate`] as often as needed, from as many threads as
//! needed: the tree is immutable and shared behind an `Arc`.

use std::sync::Arc;

use rayon::prelude::*;
use serde_json::Value;
use tracing::trace;

use crate::check::CheckNode;
use crate::compiler::Compiler;
use crate::error::{SchemaError, ValidationError};
use crate::path::JsonPath;
use crate::value::kind_name;

/// Root path used when none is configured.
pub const DEFAULT_ROOT_PATH: &str = "root";

/// A compiled schema, ready to validate values.
///
/// # Example
///
/// ```rust
/// use checktree::Validator;
/// use serde_json::json;
///
/// let validator = Validator::new(&json!({
///     "type": "array",
///     "items": {"type": "integer", "minimum": 0},
///     "uniqueItems": true
/// }))
/// .unwrap();
///
/// assert!(validator.validate(&json!([1, 2, 3])).is_ok());
///
/// let error = validator.validate(&json!([1, -2])).unwrap_err();
/// assert_eq!(error.path, "root/items/minimum");
/// assert_eq!(error.location.to_string(), "[1]");
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    root: Arc<CheckNode>,
}

impl Validator {
    /// Compiles `schema` with default settings.
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        Self::builder().build(schema)
    }

    /// Returns a builder for configuring compilation.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Validates a value, stopping at the first violated rule.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.root
            .evaluate(value, &JsonPath::root())
            .inspect_err(|e| {
                trace!(
                    path = %e.path,
                    keyword = e.keyword,
                    location = %e.location,
                    kind = kind_name(value),
                    "value rejected"
                )
            })
    }

    /// Returns true if the value passes every rule.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Validates independent values in parallel.
    ///
    /// Results are returned in input order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use checktree::Validator;
    /// use serde_json::json;
    ///
    /// let validator = Validator::new(&json!({"type": "string"})).unwrap();
    /// let results = validator.validate_many(&[json!("a"), json!(1), json!("b")]);
    ///
    /// assert!(results[0].is_ok());
    /// assert!(results[1].is_err());
    /// assert!(results[2].is_ok());
    /// ```
    pub fn validate_many(&self, values: &[Value]) -> Vec<Result<(), ValidationError>> {
        values.par_iter().map(|value| self.validate(value)).collect()
    }

    /// Returns the root of the compiled check tree.
    pub fn root(&self) -> &CheckNode {
        &self.root
    }
}

/// Configuration for building a [`Validator`].
///
/// # Example
///
/// ```rust
/// use checktree::Validator;
/// use serde_json::json;
///
/// let validator = Validator::builder()
///     .root_path("#")
///     .max_depth(8)
///     .regex_size_limit(64 * 1024)
///     .backtrack_limit(10_000)
///     .build(&json!({"maxLength": 3}))
///     .unwrap();
///
/// let error = validator.validate(&json!("abcd")).unwrap_err();
/// assert_eq!(error.path, "#/maxLength");
/// ```
#[derive(Debug, Clone)]
pub struct ValidatorBuilder {
    root_path: String,
    compiler: Compiler,
}

impl ValidatorBuilder {
    /// Creates a builder with the default root path and limits.
    pub fn new() -> Self {
        Self {
            root_path: DEFAULT_ROOT_PATH.to_string(),
            compiler: Compiler::new(),
        }
    }

    /// Sets the path prefix of every check and error (default `root`).
    pub fn root_path(mut self, path: impl Into<String>) -> Self {
        self.root_path = path.into();
        self
    }

    /// Sets the maximum subschema nesting depth (default 100).
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.compiler = self.compiler.with_max_depth(depth);
        self
    }

    /// Sets the compiled size limit of each `pattern` (default 1 MiB).
    pub fn regex_size_limit(mut self, limit: usize) -> Self {
        self.compiler = self.compiler.with_regex_size_limit(limit);
        self
    }

    /// Sets the backtracking step limit of each lookaround or backreference
    /// `pattern` match (default 1,000,000).
    pub fn backtrack_limit(mut self, limit: usize) -> Self {
        self.compiler = self.compiler.with_backtrack_limit(limit);
        self
    }

    /// Compiles `schema` into a validator.
    pub fn build(&self, schema: &Value) -> Result<Validator, SchemaError> {
        let root = self.compiler.compile(schema, &self.root_path)?;
        Ok(Validator {
            root: Arc::new(root),
        })
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator>();
    assert_sync::<Validator>();
};
