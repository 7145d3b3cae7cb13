//! Compiled check nodes.
//!
//! A schema compiles into a tree of [`CheckNode`]s. Each node holds one
//! keyword's payload and the schema path it came from, and evaluates a value
//! to either success or the first [`ValidationError`] it finds. Nodes never
//! change after construction, so one tree serves any number of concurrent
//! validations.
//!
//! Keyword checks are independent of `type`: a check whose natural domain is
//! strings (say `minLength`) passes any non-string value. Rejecting the wrong
//! kind is the job of a `type` check compiled alongside it.

mod array;
mod combinators;
mod literal;
mod numeric;
mod string;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::error::ValidationError;
use crate::path::JsonPath;
use crate::pattern::EcmaRegex;
use crate::value::{canonical_key, ValueKind};

/// Which side of a numeric range a `Range` check bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Minimum,
    MinimumExclusive,
    Maximum,
    MaximumExclusive,
}

impl RangeBound {
    /// Returns the schema keyword for this bound.
    pub fn keyword(self) -> &'static str {
        match self {
            RangeBound::Minimum => "minimum",
            RangeBound::MinimumExclusive => "minimumExclusive",
            RangeBound::Maximum => "maximum",
            RangeBound::MaximumExclusive => "maximumExclusive",
        }
    }
}

/// Lower or upper bound on a length or item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBound {
    Min,
    Max,
}

/// One compiled, evaluable rule.
#[derive(Debug, Clone)]
pub enum CheckNode {
    /// Value must be of the given kind.
    Type { path: String, kind: ValueKind },

    /// Every child must pass; the first failing child's error is returned
    /// as is.
    AllOf { path: String, children: Vec<CheckNode> },

    /// At least one child must pass. Produced only by a `type` array.
    AnyOf { path: String, children: Vec<CheckNode> },

    /// Value must equal one of the allowed values.
    ///
    /// `allowed` is keyed by [`canonical_key`] and never holds null; null is
    /// admitted only through `null_allowed`.
    Enum {
        path: String,
        allowed: IndexMap<String, Value>,
        null_allowed: bool,
    },

    /// Value must equal the literal.
    Const { path: String, literal: Value },

    /// Numbers must be an integer multiple of `divisor`.
    MultipleOf { path: String, divisor: u64 },

    /// Numbers must lie on the permitted side of `border`.
    Range {
        path: String,
        bound: RangeBound,
        border: Number,
    },

    /// Strings must have at least / at most `limit` characters.
    Length {
        path: String,
        bound: SizeBound,
        limit: usize,
    },

    /// Strings must match the pattern somewhere.
    Pattern { path: String, regex: EcmaRegex },

    /// Every array element must pass `child`.
    ItemsUniform { path: String, child: Box<CheckNode> },

    /// Element `i` must pass `children[i]`; extra elements are not checked.
    ItemsPositional { path: String, children: Vec<CheckNode> },

    /// Every element at index `offset` or later must pass `child`.
    AdditionalItems {
        path: String,
        child: Box<CheckNode>,
        offset: usize,
    },

    /// Arrays must have at least / at most `limit` elements.
    ArraySize {
        path: String,
        bound: SizeBound,
        limit: usize,
    },

    /// No two array elements may be structurally equal.
    UniqueItems { path: String },

    /// At least one array element must pass `child`.
    Contains { path: String, child: Box<CheckNode> },
}

impl CheckNode {
    /// Builds an `Enum` check from the values listed in a schema.
    pub fn enumeration(path: impl Into<String>, values: &[Value]) -> Self {
        let mut allowed = IndexMap::with_capacity(values.len());
        let mut null_allowed = false;
        for value in values {
            if value.is_null() {
                null_allowed = true;
            } else {
                allowed
                    .entry(canonical_key(value))
                    .or_insert_with(|| value.clone());
            }
        }
        CheckNode::Enum {
            path: path.into(),
            allowed,
            null_allowed,
        }
    }

    /// Returns the schema path this node was compiled from.
    pub fn path(&self) -> &str {
        match self {
            CheckNode::Type { path, .. }
            | CheckNode::AllOf { path, .. }
            | CheckNode::AnyOf { path, .. }
            | CheckNode::Enum { path, .. }
            | CheckNode::Const { path, .. }
            | CheckNode::MultipleOf { path, .. }
            | CheckNode::Range { path, .. }
            | CheckNode::Length { path, .. }
            | CheckNode::Pattern { path, .. }
            | CheckNode::ItemsUniform { path, .. }
            | CheckNode::ItemsPositional { path, .. }
            | CheckNode::AdditionalItems { path, .. }
            | CheckNode::ArraySize { path, .. }
            | CheckNode::UniqueItems { path }
            | CheckNode::Contains { path, .. } => path,
        }
    }

    /// Returns the schema keyword that produced this node.
    pub fn keyword(&self) -> &'static str {
        match self {
            CheckNode::Type { .. } => "type",
            CheckNode::AllOf { .. } => "allOf",
            CheckNode::AnyOf { .. } => "anyOf",
            CheckNode::Enum { .. } => "enum",
            CheckNode::Const { .. } => "const",
            CheckNode::MultipleOf { .. } => "multipleOf",
            CheckNode::Range { bound, .. } => bound.keyword(),
            CheckNode::Length {
                bound: SizeBound::Min,
                ..
            } => "minLength",
            CheckNode::Length {
                bound: SizeBound::Max,
                ..
            } => "maxLength",
            CheckNode::Pattern { .. } => "pattern",
            CheckNode::ItemsUniform { .. } | CheckNode::ItemsPositional { .. } => "items",
            CheckNode::AdditionalItems { .. } => "additionalItems",
            CheckNode::ArraySize {
                bound: SizeBound::Min,
                ..
            } => "minItems",
            CheckNode::ArraySize {
                bound: SizeBound::Max,
                ..
            } => "maxItems",
            CheckNode::UniqueItems { .. } => "uniqueItems",
            CheckNode::Contains { .. } => "contains",
        }
    }

    /// Returns the direct children of this node.
    pub fn children(&self) -> &[CheckNode] {
        match self {
            CheckNode::AllOf { children, .. }
            | CheckNode::AnyOf { children, .. }
            | CheckNode::ItemsPositional { children, .. } => children,
            CheckNode::ItemsUniform { child, .. }
            | CheckNode::AdditionalItems { child, .. }
            | CheckNode::Contains { child, .. } => std::slice::from_ref(child.as_ref()),
            _ => &[],
        }
    }

    /// Counts this node and all its descendants.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(CheckNode::node_count).sum::<usize>()
    }

    /// Evaluates `value` against this node.
    ///
    /// `location` is where `value` sits inside the top-level value; nodes that
    /// descend into array elements extend it with the element index.
    ///
    /// # Example
    ///
    /// ```rust
    /// use checktree::{compile, JsonPath};
    /// use serde_json::json;
    ///
    /// let node = compile(&json!({"minLength": 2}), "root").unwrap();
    ///
    /// assert!(node.evaluate(&json!("ab"), &JsonPath::root()).is_ok());
    /// let error = node.evaluate(&json!("a"), &JsonPath::root()).unwrap_err();
    /// assert_eq!(error.path, "root/minLength");
    /// ```
    pub fn evaluate(&self, value: &Value, location: &JsonPath) -> Result<(), ValidationError> {
        match self {
            CheckNode::Type { path, kind } => literal::check_type(path, *kind, value, location),
            CheckNode::AllOf { children, .. } => combinators::all_of(children, value, location),
            CheckNode::AnyOf { path, children } => {
                combinators::any_of(path, children, value, location)
            }
            CheckNode::Enum {
                path,
                allowed,
                null_allowed,
            } => literal::check_enum(path, allowed, *null_allowed, value, location),
            CheckNode::Const { path, literal } => {
                literal::check_const(path, literal, value, location)
            }
            CheckNode::MultipleOf { path, divisor } => {
                numeric::check_multiple_of(path, *divisor, value, location)
            }
            CheckNode::Range {
                path,
                bound,
                border,
            } => numeric::check_range(path, *bound, border, value, location),
            CheckNode::Length { path, bound, limit } => {
                string::check_length(path, *bound, *limit, value, location)
            }
            CheckNode::Pattern { path, regex } => {
                string::check_pattern(path, regex, value, location)
            }
            CheckNode::ItemsUniform { child, .. } => array::items_uniform(child, value, location),
            CheckNode::ItemsPositional { children, .. } => {
                array::items_positional(children, value, location)
            }
            CheckNode::AdditionalItems { child, offset, .. } => {
                array::additional_items(child, *offset, value, location)
            }
            CheckNode::ArraySize { path, bound, limit } => {
                array::check_size(path, *bound, *limit, value, location)
            }
            CheckNode::UniqueItems { path } => array::check_unique(path, value, location),
            CheckNode::Contains { path, child } => {
                array::check_contains(path, child, value, location)
            }
        }
    }
}

/// Builds the failure for a check.
pub(crate) fn fail(
    path: &str,
    keyword: &'static str,
    location: &JsonPath,
    reason: impl Into<String>,
) -> Result<(), ValidationError> {
    Err(ValidationError::new(path, keyword, location.clone(), reason))
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<CheckNode>();
    assert_sync::<CheckNode>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enumeration_separates_null() {
        let node = CheckNode::enumeration("root/enum", &[json!(1), json!(null), json!(1.0)]);
        match node {
            CheckNode::Enum {
                allowed,
                null_allowed,
                ..
            } => {
                assert!(null_allowed);
                assert_eq!(allowed.len(), 1);
            }
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_and_path() {
        let node = CheckNode::Length {
            path: "root/maxLength".to_string(),
            bound: SizeBound::Max,
            limit: 3,
        };
        assert_eq!(node.keyword(), "maxLength");
        assert_eq!(node.path(), "root/maxLength");

        let node = CheckNode::Range {
            path: "root/minimumExclusive".to_string(),
            bound: RangeBound::MinimumExclusive,
            border: Number::from(0),
        };
        assert_eq!(node.keyword(), "minimumExclusive");
    }

    #[test]
    fn test_node_count() {
        let leaf = CheckNode::UniqueItems {
            path: "root/items/uniqueItems".to_string(),
        };
        let node = CheckNode::AllOf {
            path: "root".to_string(),
            children: vec![
                CheckNode::Type {
                    path: "root/type".to_string(),
                    kind: ValueKind::Array,
                },
                CheckNode::ItemsUniform {
                    path: "root/items".to_string(),
                    child: Box::new(leaf),
                },
            ],
        };
        assert_eq!(node.node_count(), 4);
        assert_eq!(node.children().len(), 2);
    }
}
