//! # Checktree
//!
//! Validates JSON values against a declarative schema by compiling the
//! schema once into an immutable tree of checks, then evaluating that tree
//! against any number of values.
//!
//! ## Overview
//!
//! Validation has two phases that fail independently:
//!
//! - **Compile**: a schema object becomes a [`CheckNode`] tree. A malformed
//!   keyword produces a [`SchemaError`] and no validator.
//! - **Validate**: a value is evaluated against the tree. The first violated
//!   rule produces a [`ValidationError`]; evaluation stops there.
//!
//! Recognised keywords are `type`, `enum`, `const`, `multipleOf`, `minimum`,
//! `minimumExclusive`, `maximum`, `maximumExclusive`, `minLength`,
//! `maxLength`, `pattern`, `items`, `additionalItems`, `minItems`,
//! `maxItems`, `uniqueItems` and `contains`. Anything else is ignored.
//!
//! ## Core Types
//!
//! - [`Validator`]: a compiled schema; the main entry point
//! - [`ValidatorBuilder`]: root path and compile limits
//! - [`CheckNode`]: one compiled rule
//! - [`SchemaError`] / [`ValidationError`]: compile and validate failures
//! - [`JsonPath`]: where inside a value a check failed
//!
//! ## Example
//!
//! ```rust
//! use checktree::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::new(&json!({
//!     "type": ["string", "integer"],
//!     "minLength": 2
//! }))
//! .unwrap();
//!
//! assert!(validator.validate(&json!("ok")).is_ok());
//! assert!(validator.validate(&json!(3)).is_ok());
//!
//! let error = validator.validate(&json!(3.5)).unwrap_err();
//! assert_eq!(error.path, "root/anyOf");
//! assert_eq!(error.reason, "does not satisfy any check");
//! ```

pub mod check;
pub mod compiler;
pub mod error;
pub mod path;
pub mod pattern;
pub mod validator;
pub mod value;

pub use check::{CheckNode, RangeBound, SizeBound};
pub use compiler::{compile, Compiler};
pub use error::{SchemaError, ValidationError};
pub use path::JsonPath;
pub use pattern::{EcmaRegex, PatternError};
pub use validator::{Validator, ValidatorBuilder};
pub use value::ValueKind;
