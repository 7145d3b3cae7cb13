//! `allOf` and `anyOf` evaluation.
//!
//! `AllOf` wraps the checks of one schema object and stops at the first
//! failure, passing the child's error through untouched so the reported path
//! points at the keyword that failed. `AnyOf` comes from a `type` array and
//! reports its own path when no alternative fits.

use serde_json::Value;

use super::{fail, CheckNode};
use crate::error::ValidationError;
use crate::path::JsonPath;

pub(super) fn all_of(
    children: &[CheckNode],
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    for child in children {
        child.evaluate(value, location)?;
    }
    Ok(())
}

pub(super) fn any_of(
    path: &str,
    children: &[CheckNode],
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    if children
        .iter()
        .any(|child| child.evaluate(value, location).is_ok())
    {
        Ok(())
    } else {
        fail(path, "anyOf", location, "does not satisfy any check")
    }
}
