//! Polars adapters for the IV calculators
//!
//! Run `iv_numeric` / `iv_categorical` directly on columns or a DataFrame,
//! and turn a finished table back into a DataFrame.

use anyhow::{Context, Result};
use log::warn;
use polars::prelude::*;

use super::iv::{iv_categorical, iv_numeric, IvOutput, IvRow, IvTable};
use super::options::IvOptions;
use super::target::{binary_target_values, create_target_mask, TargetMapping};
use crate::error::IvError;

/// Resolve the target column to `Option<i32>` (None = row to drop)
fn resolve_target(target: &Column, mapping: Option<&TargetMapping>) -> Result<Vec<Option<i32>>> {
    match mapping {
        Some(mapping) => create_target_mask(target, mapping),
        None => binary_target_values(target),
    }
}

fn check_lengths(target: &Column, feature: &Column) -> Result<(), IvError> {
    if target.len() != feature.len() {
        return Err(IvError::InputShape {
            target_len: target.len(),
            feature_len: feature.len(),
        });
    }
    Ok(())
}

/// Keep rows with a usable target, pairing each with its feature value
fn collect_rows<T>(
    targets: Vec<Option<i32>>,
    values: impl Iterator<Item = T>,
    feature_name: &str,
) -> (Vec<i32>, Vec<T>) {
    let mut kept_targets = Vec::with_capacity(targets.len());
    let mut kept_values = Vec::with_capacity(targets.len());
    let mut dropped = 0usize;

    for (t, v) in targets.into_iter().zip(values) {
        match t {
            Some(t) => {
                kept_targets.push(t);
                kept_values.push(v);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(
            "Feature '{}': dropped {} rows with a null or unmapped target",
            feature_name, dropped
        );
    }

    (kept_targets, kept_values)
}

fn numeric_on_columns(
    target: &Column,
    feature: &Column,
    bins: usize,
    mapping: Option<&TargetMapping>,
    options: &IvOptions,
) -> Result<IvOutput<usize>> {
    check_lengths(target, feature)?;

    let targets = resolve_target(target, mapping)?;
    let float_col = feature
        .cast(&DataType::Float64)
        .with_context(|| format!("Feature column '{}' is not numeric", feature.name()))?;
    let values = float_col.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN));

    let (targets, values) = collect_rows(targets, values, &options.feature_name);
    let output = iv_numeric(&targets, &values, bins, options)?;
    Ok(output)
}

fn categorical_on_columns(
    target: &Column,
    feature: &Column,
    mapping: Option<&TargetMapping>,
    options: &IvOptions,
) -> Result<IvOutput<String>> {
    check_lengths(target, feature)?;

    let targets = resolve_target(target, mapping)?;
    let string_col = feature.cast(&DataType::String)?;
    let values = string_col.str()?.into_iter().map(|v| v.map(str::to_string));

    let (targets, values) = collect_rows(targets, values, &options.feature_name);

    // Null categories are missing and excluded, like null numeric values.
    let (targets, values): (Vec<i32>, Vec<String>) = targets
        .into_iter()
        .zip(values)
        .filter_map(|(t, v)| v.map(|v| (t, v)))
        .unzip();

    let output = iv_categorical(&targets, &values, options)?;
    Ok(output)
}

/// Numeric IV on a pair of columns; the target must be numeric 0/1.
///
/// Null feature values are missing. Rows with a null target are dropped.
pub fn iv_numeric_column(
    target: &Column,
    feature: &Column,
    bins: usize,
    options: &IvOptions,
) -> Result<IvOutput<usize>> {
    numeric_on_columns(target, feature, bins, None, options)
}

/// Categorical IV on a pair of columns; the feature is grouped by its
/// string representation.
pub fn iv_categorical_column(
    target: &Column,
    feature: &Column,
    options: &IvOptions,
) -> Result<IvOutput<String>> {
    categorical_on_columns(target, feature, None, options)
}

/// Numeric IV for `feature` against `target` in a DataFrame
///
/// # Arguments
/// * `df` - DataFrame holding both columns
/// * `target` - Name of the target column
/// * `feature` - Name of the feature column, also used as the feature name
/// * `bins` - Requested number of quantile bins
/// * `target_mapping` - Optional mapping for non-binary target columns
/// * `return_table` - Return the full table rather than the summary
pub fn iv_numeric_frame(
    df: &DataFrame,
    target: &str,
    feature: &str,
    bins: usize,
    target_mapping: Option<&TargetMapping>,
    return_table: bool,
) -> Result<IvOutput<usize>> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;
    let feature_col = df
        .column(feature)
        .with_context(|| format!("Feature column '{}' not found", feature))?;

    let options = IvOptions::new()
        .with_feature_name(feature)
        .with_return_table(return_table);

    numeric_on_columns(target_col, feature_col, bins, target_mapping, &options)
        .with_context(|| format!("Failed to calculate IV for feature '{}'", feature))
}

/// Categorical IV for `feature` against `target` in a DataFrame
pub fn iv_categorical_frame(
    df: &DataFrame,
    target: &str,
    feature: &str,
    target_mapping: Option<&TargetMapping>,
    return_table: bool,
) -> Result<IvOutput<String>> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;
    let feature_col = df
        .column(feature)
        .with_context(|| format!("Feature column '{}' not found", feature))?;

    let options = IvOptions::new()
        .with_feature_name(feature)
        .with_return_table(return_table);

    categorical_on_columns(target_col, feature_col, target_mapping, &options)
        .with_context(|| format!("Failed to calculate IV for feature '{}'", feature))
}

/// The seven statistics columns shared by bin and category tables
fn stats_columns<K>(rows: &[IvRow<K>]) -> Vec<Column> {
    let count: Vec<u64> = rows.iter().map(|r| r.count as u64).collect();
    let bads: Vec<u64> = rows.iter().map(|r| r.bads as u64).collect();
    let goods: Vec<u64> = rows.iter().map(|r| r.goods as u64).collect();
    let bads_pct: Vec<f64> = rows.iter().map(|r| r.bads_pct).collect();
    let goods_pct: Vec<f64> = rows.iter().map(|r| r.goods_pct).collect();
    let woe: Vec<f64> = rows.iter().map(|r| r.woe).collect();
    let iv: Vec<f64> = rows.iter().map(|r| r.iv).collect();

    vec![
        Column::new("count".into(), count),
        Column::new("bads".into(), bads),
        Column::new("goods".into(), goods),
        Column::new("bads_pct".into(), bads_pct),
        Column::new("goods_pct".into(), goods_pct),
        Column::new("woe".into(), woe),
        Column::new("iv".into(), iv),
    ]
}

impl IvTable<usize> {
    /// Convert to a DataFrame with columns `bin, count, bads, goods, bads_pct, goods_pct, woe, iv`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let bins: Vec<u64> = self.rows().iter().map(|r| r.key as u64).collect();
        let mut columns = vec![Column::new(self.kind().key_column().into(), bins)];
        columns.extend(stats_columns(self.rows()));
        Ok(DataFrame::new(columns)?)
    }
}

impl IvTable<String> {
    /// Convert to a DataFrame with columns `cat, count, bads, goods, bads_pct, goods_pct, woe, iv`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let cats: Vec<&str> = self.rows().iter().map(|r| r.key.as_str()).collect();
        let mut columns = vec![Column::new(self.kind().key_column().into(), cats)];
        columns.extend(stats_columns(self.rows()));
        Ok(DataFrame::new(columns)?)
    }
}
