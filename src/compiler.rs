//! Schema compiler.
//!
//! Turns a schema object into a [`CheckNode`] tree. Keywords are read in a
//! fixed order and each recognised keyword contributes zero or one check:
//!
//! 1. `type`
//! 2. `enum`
//! 3. `const`
//! 4. `multipleOf`
//! 5. `minimum`, `minimumExclusive`, `maximum`, `maximumExclusive`
//! 6. `minLength`, `maxLength`
//! 7. `pattern`
//! 8. `items`
//! 9. `additionalItems`
//! 10. `minItems`, `maxItems`
//! 11. `uniqueItems`
//! 12. `contains`
//!
//! A schema yielding exactly one check compiles to that check; otherwise the
//! checks are wrapped, in this order, in an `AllOf` at the schema's path.
//! Unknown keywords are ignored. The first malformed keyword aborts
//! compilation.

use serde_json::{Map, Value};
use tracing::debug;

use crate::check::{CheckNode, RangeBound, SizeBound};
use crate::error::SchemaError;
use crate::pattern::{EcmaRegex, DEFAULT_BACKTRACK_LIMIT, DEFAULT_REGEX_SIZE_LIMIT};
use crate::value::ValueKind;

/// Default limit on how deeply subschemas may nest.
pub const DEFAULT_MAX_DEPTH: usize = 100;

type Schema = Map<String, Value>;

/// Compiles `schema` with default settings, rooting every path at `path`.
///
/// # Example
///
/// ```rust
/// use checktree::compile;
/// use serde_json::json;
///
/// let node = compile(&json!({"type": "string", "maxLength": 8}), "root").unwrap();
/// assert_eq!(node.keyword(), "allOf");
/// assert_eq!(node.children().len(), 2);
///
/// // A single keyword is not wrapped
/// let node = compile(&json!({"type": "string"}), "root").unwrap();
/// assert_eq!(node.path(), "root/type");
/// ```
pub fn compile(schema: &Value, path: &str) -> Result<CheckNode, SchemaError> {
    Compiler::new().compile(schema, path)
}

/// A configurable schema compiler.
///
/// The compiler holds only limits; it can be reused for any number of
/// schemas.
#[derive(Debug, Clone)]
pub struct Compiler {
    max_depth: usize,
    regex_size_limit: usize,
    backtrack_limit: usize,
}

impl Compiler {
    /// Creates a compiler with the default limits.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }

    /// Sets how many levels of nested subschemas are accepted.
    ///
    /// The root schema is depth 0; each `items`, `additionalItems` or
    /// `contains` subschema adds one level.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the compiled size limit for each `pattern`.
    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    /// Sets how many backtracking steps one match of a lookaround or
    /// backreference pattern may take.
    pub fn with_backtrack_limit(mut self, limit: usize) -> Self {
        self.backtrack_limit = limit;
        self
    }

    /// Returns the maximum subschema depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the compiled size limit for patterns.
    pub fn regex_size_limit(&self) -> usize {
        self.regex_size_limit
    }

    /// Returns the backtracking step limit for patterns.
    pub fn backtrack_limit(&self) -> usize {
        self.backtrack_limit
    }

    /// Compiles `schema` into a check tree rooted at `path`.
    pub fn compile(&self, schema: &Value, path: &str) -> Result<CheckNode, SchemaError> {
        let result = self.compile_at(schema, path, 0);
        match &result {
            Ok(node) => debug!(path, nodes = node.node_count(), "compiled schema"),
            Err(e) => debug!(path = %e.path, reason = %e.reason, "schema rejected"),
        }
        result
    }

    fn compile_at(&self, schema: &Value, path: &str, depth: usize) -> Result<CheckNode, SchemaError> {
        if depth > self.max_depth {
            return Err(SchemaError::new(
                path,
                format!("Schema nesting exceeds maximum depth of {}", self.max_depth),
            ));
        }
        let Value::Object(schema) = schema else {
            return Err(SchemaError::new(path, "Schema must be an object"));
        };

        let mut checks = Vec::new();
        checks.extend(compile_type(schema, path)?);
        checks.extend(compile_enum(schema, path)?);
        checks.extend(compile_const(schema, path));
        checks.extend(compile_multiple_of(schema, path)?);
        for bound in [
            RangeBound::Minimum,
            RangeBound::MinimumExclusive,
            RangeBound::Maximum,
            RangeBound::MaximumExclusive,
        ] {
            checks.extend(compile_range(schema, path, bound)?);
        }
        for (keyword, bound) in [("minLength", SizeBound::Min), ("maxLength", SizeBound::Max)] {
            checks.extend(
                size_limit(schema, path, keyword)?.map(|(path, limit)| CheckNode::Length {
                    path,
                    bound,
                    limit,
                }),
            );
        }
        checks.extend(self.compile_pattern(schema, path)?);
        checks.extend(self.compile_items(schema, path, depth)?);
        checks.extend(self.compile_additional_items(schema, path, depth)?);
        for (keyword, bound) in [("minItems", SizeBound::Min), ("maxItems", SizeBound::Max)] {
            checks.extend(
                size_limit(schema, path, keyword)?.map(|(path, limit)| CheckNode::ArraySize {
                    path,
                    bound,
                    limit,
                }),
            );
        }
        checks.extend(compile_unique_items(schema, path)?);
        checks.extend(self.compile_contains(schema, path, depth)?);

        Ok(if checks.len() == 1 {
            checks.swap_remove(0)
        } else {
            CheckNode::AllOf {
                path: path.to_string(),
                children: checks,
            }
        })
    }

    fn compile_pattern(&self, schema: &Schema, path: &str) -> Result<Option<CheckNode>, SchemaError> {
        let Some(raw) = schema.get("pattern") else {
            return Ok(None);
        };
        let at = keyword_path(path, "pattern");
        let Value::String(source) = raw else {
            return Err(SchemaError::new(at, "pattern must be a string"));
        };
        match EcmaRegex::with_limits(source, self.regex_size_limit, self.backtrack_limit) {
            Ok(regex) => Ok(Some(CheckNode::Pattern { path: at, regex })),
            Err(e) => Err(SchemaError::new(at, format!("Invalid pattern: {}", e))),
        }
    }

    fn compile_items(
        &self,
        schema: &Schema,
        path: &str,
        depth: usize,
    ) -> Result<Option<CheckNode>, SchemaError> {
        let Some(raw) = schema.get("items") else {
            return Ok(None);
        };
        let at = keyword_path(path, "items");
        match raw {
            Value::Object(_) => {
                let child = self.compile_at(raw, &at, depth + 1)?;
                Ok(Some(CheckNode::ItemsUniform {
                    path: at,
                    child: Box::new(child),
                }))
            }
            Value::Array(schemas) => {
                let children = schemas
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.compile_at(item, &format!("{}/{}", at, i), depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(CheckNode::ItemsPositional { path: at, children }))
            }
            _ => Err(SchemaError::new(at, "items must be an object or an array")),
        }
    }

    fn compile_additional_items(
        &self,
        schema: &Schema,
        path: &str,
        depth: usize,
    ) -> Result<Option<CheckNode>, SchemaError> {
        let Some(raw) = schema.get("additionalItems") else {
            return Ok(None);
        };
        let at = keyword_path(path, "additionalItems");
        if !raw.is_object() {
            return Err(SchemaError::new(at, "additionalItems must be an object"));
        }
        // Only positional `items` leave elements for `additionalItems` to check.
        let Some(Value::Array(positional)) = schema.get("items") else {
            return Ok(None);
        };
        let child = self.compile_at(raw, &at, depth + 1)?;
        Ok(Some(CheckNode::AdditionalItems {
            path: at,
            child: Box::new(child),
            offset: positional.len(),
        }))
    }

    fn compile_contains(
        &self,
        schema: &Schema,
        path: &str,
        depth: usize,
    ) -> Result<Option<CheckNode>, SchemaError> {
        let Some(raw) = schema.get("contains") else {
            return Ok(None);
        };
        let at = keyword_path(path, "contains");
        if !raw.is_object() {
            return Err(SchemaError::new(at, "contains must be an object"));
        }
        let child = self.compile_at(raw, &at, depth + 1)?;
        Ok(Some(CheckNode::Contains {
            path: at,
            child: Box::new(child),
        }))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

fn keyword_path(path: &str, keyword: &str) -> String {
    format!("{}/{}", path, keyword)
}

fn parse_kind(name: &str, at: &str) -> Result<ValueKind, SchemaError> {
    name.parse::<ValueKind>()
        .map_err(|e| SchemaError::new(at, e.to_string()))
}

fn compile_type(schema: &Schema, path: &str) -> Result<Option<CheckNode>, SchemaError> {
    let Some(raw) = schema.get("type") else {
        return Ok(None);
    };
    let at = keyword_path(path, "type");
    match raw {
        Value::String(name) => {
            let kind = parse_kind(name, &at)?;
            Ok(Some(CheckNode::Type { path: at, kind }))
        }
        Value::Array(names) => {
            if names.is_empty() {
                return Err(SchemaError::new(at, "type array must not be empty"));
            }
            let any_of = keyword_path(path, "anyOf");
            let mut kinds: Vec<ValueKind> = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let member = format!("{}/{}", at, i);
                let Value::String(name) = name else {
                    return Err(SchemaError::new(member, "type array must contain only strings"));
                };
                let kind = parse_kind(name, &member)?;
                if kinds.contains(&kind) {
                    return Err(SchemaError::new(member, format!("Duplicate type '{}'", kind)));
                }
                kinds.push(kind);
            }
            let children = kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| CheckNode::Type {
                    path: format!("{}/{}", any_of, i),
                    kind,
                })
                .collect();
            Ok(Some(CheckNode::AnyOf {
                path: any_of,
                children,
            }))
        }
        _ => Err(SchemaError::new(
            at,
            "type must be a string or an array of strings",
        )),
    }
}

fn compile_enum(schema: &Schema, path: &str) -> Result<Option<CheckNode>, SchemaError> {
    let Some(raw) = schema.get("enum") else {
        return Ok(None);
    };
    let at = keyword_path(path, "enum");
    match raw {
        Value::Array(values) => Ok(Some(CheckNode::enumeration(at, values))),
        _ => Err(SchemaError::new(at, "enum must be an array")),
    }
}

fn compile_const(schema: &Schema, path: &str) -> Option<CheckNode> {
    schema.get("const").map(|literal| CheckNode::Const {
        path: keyword_path(path, "const"),
        literal: literal.clone(),
    })
}

fn compile_multiple_of(schema: &Schema, path: &str) -> Result<Option<CheckNode>, SchemaError> {
    let Some(raw) = schema.get("multipleOf") else {
        return Ok(None);
    };
    let at = keyword_path(path, "multipleOf");
    match integer_of(raw) {
        Some(divisor) if divisor > 0 => Ok(Some(CheckNode::MultipleOf { path: at, divisor })),
        _ => Err(SchemaError::new(at, "multipleOf must be a positive integer")),
    }
}

fn compile_range(
    schema: &Schema,
    path: &str,
    bound: RangeBound,
) -> Result<Option<CheckNode>, SchemaError> {
    let keyword = bound.keyword();
    let Some(raw) = schema.get(keyword) else {
        return Ok(None);
    };
    let at = keyword_path(path, keyword);
    match raw {
        Value::Number(border) => Ok(Some(CheckNode::Range {
            path: at,
            bound,
            border: border.clone(),
        })),
        _ => Err(SchemaError::new(at, format!("{} must be a number", keyword))),
    }
}

/// Reads a non-negative integer keyword, returning its path alongside.
fn size_limit(
    schema: &Schema,
    path: &str,
    keyword: &str,
) -> Result<Option<(String, usize)>, SchemaError> {
    let Some(raw) = schema.get(keyword) else {
        return Ok(None);
    };
    let at = keyword_path(path, keyword);
    match integer_of(raw).and_then(|n| usize::try_from(n).ok()) {
        Some(limit) => Ok(Some((at, limit))),
        None => Err(SchemaError::new(
            at,
            format!("{} must be a non-negative integer", keyword),
        )),
    }
}

fn compile_unique_items(schema: &Schema, path: &str) -> Result<Option<CheckNode>, SchemaError> {
    let at = keyword_path(path, "uniqueItems");
    match schema.get("uniqueItems") {
        None | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some(CheckNode::UniqueItems { path: at })),
        Some(_) => Err(SchemaError::new(at, "uniqueItems must be a boolean")),
    }
}

/// Returns the value as a non-negative integer; integral floats qualify.
fn integer_of(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}
