//! Instance locations for reporting where in a value a check failed.
//!
//! Schema paths (`root/items/type`) say which rule failed; a [`JsonPath`]
//! says which element of the validated value it failed on. Only array
//! keywords descend into a value, so a location is a sequence of indices.

use std::fmt::{self, Display};

/// A location inside a validated value, built from array indices.
///
/// # Example
///
/// ```rust
/// use checktree::JsonPath;
///
/// let path = JsonPath::root().push_index(2).push_index(0);
///
/// assert_eq!(path.to_string(), "[2][0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    indices: Vec<usize>,
}

impl JsonPath {
    /// Creates an empty path representing the value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single index.
    pub fn from_index(idx: usize) -> Self {
        Self { indices: vec![idx] }
    }

    /// Returns a new path with an index appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.indices.len() + 1);
        indices.extend_from_slice(&self.indices);
        indices.push(index);
        Self { indices }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the indices from outermost to innermost.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the parent path, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        self.indices.split_last().map(|(_, rest)| Self {
            indices: rest.to_vec(),
        })
    }

    /// Returns the innermost index, or None if this is root.
    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in &self.indices {
            write!(f, "[{}]", idx)?;
        }
        Ok(())
    }
}
