//! Binary target validation and mapping
//!
//! The calculators take targets as 0/1 integers. Data frame targets are
//! either numeric 0/1 columns or arbitrary values mapped through a
//! `TargetMapping`.

use anyhow::{bail, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::IvError;

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Mapping configuration for converting target column values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (event, "bad")
    pub event_value: String,
    /// Value that maps to 0 (non-event, "good")
    pub non_event_value: String,
}

impl TargetMapping {
    /// Create a new target mapping
    pub fn new(event_value: impl Into<String>, non_event_value: impl Into<String>) -> Self {
        Self {
            event_value: event_value.into(),
            non_event_value: non_event_value.into(),
        }
    }
}

/// Check that every target value is 0 or 1, reporting the first offender.
pub fn validate_binary_target(target: &[i32]) -> Result<(), IvError> {
    match target.iter().enumerate().find(|(_, &t)| t != 0 && t != 1) {
        Some((index, &value)) => Err(IvError::NonBinaryTarget { index, value }),
        None => Ok(()),
    }
}

/// Read a numeric 0/1 target column.
///
/// Nulls come back as `None` so callers can drop those rows. Any other value
/// is an error.
pub fn binary_target_values(col: &Column) -> Result<Vec<Option<i32>>> {
    if !col.dtype().is_primitive_numeric() && !col.dtype().is_bool() {
        bail!(
            "Target column '{}' has type {} - it must be numeric 0/1 or mapped with a TargetMapping",
            col.name(),
            col.dtype()
        );
    }

    let float_col = col.cast(&DataType::Float64)?;
    let mut values = Vec::with_capacity(float_col.len());
    for v in float_col.f64()?.into_iter() {
        values.push(match v {
            None => None,
            Some(x) if x.abs() < TOLERANCE => Some(0),
            Some(x) if (x - 1.0).abs() < TOLERANCE => Some(1),
            Some(x) => bail!(
                "Target column '{}' must be binary (0/1). Found value {}",
                col.name(),
                x
            ),
        });
    }

    Ok(values)
}

/// Create a binary target mask based on the mapping
///
/// Returns a Vec<Option<i32>> where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for nulls and values that match neither side
pub fn create_target_mask(col: &Column, mapping: &TargetMapping) -> Result<Vec<Option<i32>>> {
    let string_col = col.cast(&DataType::String)?;

    let mask = string_col
        .str()?
        .into_iter()
        .map(|v| match v {
            Some(s) if s == mapping.event_value => Some(1),
            Some(s) if s == mapping.non_event_value => Some(0),
            _ => None,
        })
        .collect();

    Ok(mask)
}
