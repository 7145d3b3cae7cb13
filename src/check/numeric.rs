//! `multipleOf` and range evaluation. Non-numbers pass.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::{fail, RangeBound};
use crate::error::ValidationError;
use crate::path::JsonPath;
use crate::value::{as_integer, compare_numbers};

pub(super) fn check_multiple_of(
    path: &str,
    divisor: u64,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Number(n) = value else {
        return Ok(());
    };
    if is_multiple(n, divisor) {
        Ok(())
    } else {
        fail(
            path,
            "multipleOf",
            location,
            format!("Not a multiple of {}", divisor),
        )
    }
}

fn is_multiple(n: &Number, divisor: u64) -> bool {
    match as_integer(n) {
        Some(i) => i % i128::from(divisor) == 0,
        // Only integral floats beyond the i64/u64 range get here; fractional
        // values are never multiples of an integer.
        None => n
            .as_f64()
            .is_some_and(|f| f.fract() == 0.0 && f % divisor as f64 == 0.0),
    }
}

pub(super) fn check_range(
    path: &str,
    bound: RangeBound,
    border: &Number,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::Number(n) = value else {
        return Ok(());
    };
    let ordering = compare_numbers(n, border);
    let (within, reason) = match bound {
        RangeBound::Minimum => (ordering != Ordering::Less, "Less than minimum"),
        RangeBound::MinimumExclusive => (
            ordering == Ordering::Greater,
            "Not greater than exclusive minimum",
        ),
        RangeBound::Maximum => (ordering != Ordering::Greater, "Greater than maximum"),
        RangeBound::MaximumExclusive => {
            (ordering == Ordering::Less, "Not less than exclusive maximum")
        }
    };
    if within {
        Ok(())
    } else {
        fail(
            path,
            bound.keyword(),
            location,
            format!("{} {}", reason, border),
        )
    }
}
