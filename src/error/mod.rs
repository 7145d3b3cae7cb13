//! Error types for schema compilation and value validation.
//!
//! The two phases fail independently: a [`SchemaError`] means the schema
//! itself is malformed and no validator was produced, a [`ValidationError`]
//! means a value broke one rule of a compiled schema.

mod schema_error;
mod validation_error;

pub use schema_error::SchemaError;
pub use validation_error::ValidationError;
