//! Array keyword evaluation: `items`, `additionalItems`, `minItems`,
//! `maxItems`, `uniqueItems` and `contains`. Non-arrays pass.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::Value;

use super::{fail, CheckNode, SizeBound};
use crate::error::ValidationError;
use crate::path::JsonPath;
use crate::value::canonical_key;

pub(super) fn items_uniform(
    child: &CheckNode,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    for (index, item) in items.iter().enumerate() {
        child.evaluate(item, &location.push_index(index))?;
    }
    Ok(())
}

pub(super) fn items_positional(
    children: &[CheckNode],
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    for (index, (child, item)) in children.iter().zip(items).enumerate() {
        child.evaluate(item, &location.push_index(index))?;
    }
    Ok(())
}

pub(super) fn additional_items(
    child: &CheckNode,
    offset: usize,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    for (index, item) in items.iter().enumerate().skip(offset) {
        child.evaluate(item, &location.push_index(index))?;
    }
    Ok(())
}

pub(super) fn check_size(
    path: &str,
    bound: SizeBound,
    limit: usize,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    match bound {
        SizeBound::Min if items.len() < limit => fail(
            path,
            "minItems",
            location,
            format!("Fewer than minItems {}", limit),
        ),
        SizeBound::Max if items.len() > limit => fail(
            path,
            "maxItems",
            location,
            format!("More than maxItems {}", limit),
        ),
        _ => Ok(()),
    }
}

pub(super) fn check_unique(
    path: &str,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    match find_duplicate(items) {
        Some((first, second)) => fail(
            path,
            "uniqueItems",
            location,
            format!("Items at {} and {} are not unique", first, second),
        ),
        None => Ok(()),
    }
}

/// Returns the first pair of structurally equal elements, by position of the
/// later element.
fn find_duplicate(items: &[Value]) -> Option<(usize, usize)> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match seen.entry(canonical_key(item)) {
            Entry::Occupied(entry) => return Some((*entry.get(), i)),
            Entry::Vacant(entry) => {
                entry.insert(i);
            }
        }
    }
    None
}

pub(super) fn check_contains(
    path: &str,
    child: &CheckNode,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Array(items) = value else {
        return Ok(());
    };
    let found = items
        .iter()
        .enumerate()
        .any(|(index, item)| child.evaluate(item, &location.push_index(index)).is_ok());
    if found {
        Ok(())
    } else {
        fail(
            path,
            "contains",
            location,
            "does not contain any element accepted by `contains`",
        )
    }
}
