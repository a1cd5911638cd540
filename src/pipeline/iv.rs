//! Information Value (IV) and Weight of Evidence (WoE) for a single feature
//!
//! Observations are grouped (quantile bins for numeric features, distinct
//! values for categorical ones), each group's share of goods and bads is
//! taken against the column totals, and
//!
//! ```text
//! woe = ln(goods_pct / bads_pct)
//! iv  = (goods_pct - bads_pct) * woe
//! ```
//!
//! No smoothing is applied. A group without bads (or without goods) gets an
//! infinite WoE and the non-finite value flows through to the total IV.

use std::collections::BTreeMap;

use log::debug;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::binning::quantile_bins;
use super::options::IvOptions;
use super::target::validate_binary_target;
use crate::error::IvError;

/// How the groups of a table were formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Quantile bins of a numeric feature
    Bin,
    /// Distinct values of a categorical feature
    Category,
}

impl GroupKind {
    /// Name of the key column in tables of this kind
    pub fn key_column(&self) -> &'static str {
        match self {
            GroupKind::Bin => "bin",
            GroupKind::Category => "cat",
        }
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key_column())
    }
}

/// One group (bin or category) with its WoE statistics
///
/// Rows serialize as part of an `IvTable`, where the key is written under
/// the table's key column name.
#[derive(Debug, Clone, PartialEq)]
pub struct IvRow<K> {
    /// Bin index (1-based) or category value
    pub key: K,
    /// Observations in the group
    pub count: usize,
    /// Observations with target = 1
    pub bads: usize,
    /// Observations with target = 0
    pub goods: usize,
    /// Share of all bads falling in this group
    pub bads_pct: f64,
    /// Share of all goods falling in this group
    pub goods_pct: f64,
    /// Weight of Evidence
    pub woe: f64,
    /// Contribution to the total IV
    pub iv: f64,
}

impl<K> IvRow<K> {
    /// Fraction of the group that are bads
    pub fn event_rate(&self) -> f64 {
        self.bads as f64 / self.count as f64
    }
}

/// Per-group IV table for one feature, ordered by ascending key
#[derive(Debug, Clone, PartialEq)]
pub struct IvTable<K> {
    feature_name: String,
    kind: GroupKind,
    rows: Vec<IvRow<K>>,
}

impl<K> IvTable<K> {
    pub fn feature_name(&self) -> &str {
        &self.feature_name
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn rows(&self) -> &[IvRow<K>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<IvRow<K>> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the per-group IV. Non-finite contributions are not filtered.
    pub fn total_iv(&self) -> f64 {
        self.rows.iter().map(|r| r.iv).sum()
    }

    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn total_bads(&self) -> usize {
        self.rows.iter().map(|r| r.bads).sum()
    }

    pub fn total_goods(&self) -> usize {
        self.rows.iter().map(|r| r.goods).sum()
    }

    /// Percentage of all observations that fall in `row`
    pub fn population_pct(&self, row: &IvRow<K>) -> f64 {
        row.count as f64 / self.total_count() as f64 * 100.0
    }

    /// Collapse the table into the (feature name, total IV) pair
    pub fn summary(&self) -> IvSummary {
        IvSummary {
            feature_name: self.feature_name.clone(),
            iv: self.total_iv(),
        }
    }
}

/// Row serialized with the table's key column name (`bin` or `cat`)
struct KeyedRow<'a, K> {
    key_column: &'static str,
    row: &'a IvRow<K>,
}

impl<K: Serialize> Serialize for KeyedRow<'_, K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry(self.key_column, &self.row.key)?;
        map.serialize_entry("count", &self.row.count)?;
        map.serialize_entry("bads", &self.row.bads)?;
        map.serialize_entry("goods", &self.row.goods)?;
        map.serialize_entry("bads_pct", &self.row.bads_pct)?;
        map.serialize_entry("goods_pct", &self.row.goods_pct)?;
        map.serialize_entry("woe", &self.row.woe)?;
        map.serialize_entry("iv", &self.row.iv)?;
        map.end()
    }
}

impl<K: Serialize> Serialize for IvTable<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let key_column = self.kind.key_column();
        let rows: Vec<KeyedRow<'_, K>> = self
            .rows
            .iter()
            .map(|row| KeyedRow { key_column, row })
            .collect();

        let mut state = serializer.serialize_struct("IvTable", 3)?;
        state.serialize_field("feature_name", &self.feature_name)?;
        state.serialize_field("total_iv", &self.total_iv())?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

/// Conventional reading of a feature's total IV in credit scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IvStrength {
    /// IV < 0.02
    Useless,
    /// 0.02 <= IV < 0.1
    Weak,
    /// 0.1 <= IV < 0.3
    Medium,
    /// 0.3 <= IV < 0.5
    Strong,
    /// IV >= 0.5, usually too good to be true
    Suspicious,
    /// IV is NaN
    Undefined,
}

impl IvStrength {
    pub fn from_iv(iv: f64) -> Self {
        match iv {
            v if v.is_nan() => IvStrength::Undefined,
            v if v < 0.02 => IvStrength::Useless,
            v if v < 0.1 => IvStrength::Weak,
            v if v < 0.3 => IvStrength::Medium,
            v if v < 0.5 => IvStrength::Strong,
            _ => IvStrength::Suspicious,
        }
    }
}

impl std::fmt::Display for IvStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IvStrength::Useless => "useless",
            IvStrength::Weak => "weak",
            IvStrength::Medium => "medium",
            IvStrength::Strong => "strong",
            IvStrength::Suspicious => "suspicious",
            IvStrength::Undefined => "undefined",
        };
        write!(f, "{}", label)
    }
}

/// The (feature name, total IV) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IvSummary {
    pub feature_name: String,
    pub iv: f64,
}

impl IvSummary {
    pub fn strength(&self) -> IvStrength {
        IvStrength::from_iv(self.iv)
    }
}

impl From<IvSummary> for (String, f64) {
    fn from(summary: IvSummary) -> Self {
        (summary.feature_name, summary.iv)
    }
}

/// Result of an IV calculation: the full table or just the summary,
/// depending on `IvOptions::return_table`
#[derive(Debug, Clone, PartialEq)]
pub enum IvOutput<K> {
    Table(IvTable<K>),
    Summary(IvSummary),
}

impl<K> IvOutput<K> {
    pub fn feature_name(&self) -> &str {
        match self {
            IvOutput::Table(table) => table.feature_name(),
            IvOutput::Summary(summary) => &summary.feature_name,
        }
    }

    /// Total IV, whichever form the output takes
    pub fn iv(&self) -> f64 {
        match self {
            IvOutput::Table(table) => table.total_iv(),
            IvOutput::Summary(summary) => summary.iv,
        }
    }

    pub fn into_table(self) -> Option<IvTable<K>> {
        match self {
            IvOutput::Table(table) => Some(table),
            IvOutput::Summary(_) => None,
        }
    }

    pub fn into_summary(self) -> IvSummary {
        match self {
            IvOutput::Table(table) => table.summary(),
            IvOutput::Summary(summary) => summary,
        }
    }
}

/// Running counts for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct GroupCounts {
    count: usize,
    bads: usize,
}

impl GroupCounts {
    fn observe(&mut self, target: i32) {
        self.count += 1;
        if target == 1 {
            self.bads += 1;
        }
    }

    fn goods(&self) -> usize {
        self.count - self.bads
    }
}

/// Calculate WoE and IV contribution from a group's shares of goods and bads
///
/// Follows IEEE-754: a zero share yields an infinite WoE, and 0/0 yields NaN.
pub fn calculate_woe_iv(goods_pct: f64, bads_pct: f64) -> (f64, f64) {
    let woe = (goods_pct / bads_pct).ln();
    let iv = (goods_pct - bads_pct) * woe;
    (woe, iv)
}

/// Normalize group counts against the column totals and score each group
fn score_groups<K>(feature_name: &str, kind: GroupKind, groups: BTreeMap<K, GroupCounts>) -> IvTable<K> {
    let total_bads: usize = groups.values().map(|g| g.bads).sum();
    let total_goods: usize = groups.values().map(|g| g.goods()).sum();

    debug!(
        "Feature '{}': {} groups, {} bads, {} goods",
        feature_name,
        groups.len(),
        total_bads,
        total_goods
    );

    let rows = groups
        .into_iter()
        .map(|(key, counts)| {
            let goods = counts.goods();
            let bads_pct = counts.bads as f64 / total_bads as f64;
            let goods_pct = goods as f64 / total_goods as f64;
            let (woe, iv) = calculate_woe_iv(goods_pct, bads_pct);

            IvRow {
                key,
                count: counts.count,
                bads: counts.bads,
                goods,
                bads_pct,
                goods_pct,
                woe,
                iv,
            }
        })
        .collect();

    IvTable {
        feature_name: feature_name.to_string(),
        kind,
        rows,
    }
}

fn check_shape(target: &[i32], feature_len: usize) -> Result<(), IvError> {
    if target.len() != feature_len {
        return Err(IvError::InputShape {
            target_len: target.len(),
            feature_len,
        });
    }
    Ok(())
}

fn finish<K>(table: IvTable<K>, options: &IvOptions) -> IvOutput<K> {
    if options.return_table {
        IvOutput::Table(table)
    } else {
        IvOutput::Summary(table.summary())
    }
}

/// Calculate the IV of a numeric feature using `bins` quantile bins
///
/// `NaN` and infinite feature values are treated as missing: they are left
/// out of every group and out of the column totals. When ties leave fewer
/// distinct quantile edges than requested, the bin count shrinks to fit.
///
/// A constant feature always yields a single group holding every
/// observation. pandas `qcut(duplicates='drop')` instead collapses to one
/// edge and marks every row as missing, giving an empty table and IV 0.
/// The two differ whenever that single group scores non-zero, e.g. an
/// all-zero target gives NaN here rather than 0.
///
/// # Errors
/// * `InputShape` if `target` and `feature` differ in length
/// * `InvalidArgument` if `bins` is 0 or too large to allocate its edges
/// * `NonBinaryTarget` if a target value is not 0 or 1
pub fn iv_numeric(
    target: &[i32],
    feature: &[f64],
    bins: usize,
    options: &IvOptions,
) -> Result<IvOutput<usize>, IvError> {
    check_shape(target, feature.len())?;
    if bins < 1 {
        return Err(IvError::invalid_bins(bins));
    }
    validate_binary_target(target)?;

    let binning = quantile_bins(feature, bins)?;

    let mut groups: BTreeMap<usize, GroupCounts> = BTreeMap::new();
    let mut missing = 0usize;
    for (&t, &value) in target.iter().zip(feature) {
        match binning.assign(value) {
            Some(bin) => groups.entry(bin).or_default().observe(t),
            None => missing += 1,
        }
    }

    if missing > 0 {
        debug!(
            "Feature '{}': excluded {} missing values",
            options.feature_name, missing
        );
    }

    Ok(finish(
        score_groups(&options.feature_name, GroupKind::Bin, groups),
        options,
    ))
}

/// Calculate the IV of a categorical feature, one group per distinct value
///
/// Groups are ordered by the key's `Ord`.
///
/// # Errors
/// * `InputShape` if `target` and `feature` differ in length
/// * `NonBinaryTarget` if a target value is not 0 or 1
pub fn iv_categorical<K: Ord + Clone>(
    target: &[i32],
    feature: &[K],
    options: &IvOptions,
) -> Result<IvOutput<K>, IvError> {
    check_shape(target, feature.len())?;
    validate_binary_target(target)?;

    let mut groups: BTreeMap<K, GroupCounts> = BTreeMap::new();
    for (&t, key) in target.iter().zip(feature) {
        match groups.get_mut(key) {
            Some(counts) => counts.observe(t),
            None => groups.entry(key.clone()).or_default().observe(t),
        }
    }

    Ok(finish(
        score_groups(&options.feature_name, GroupKind::Category, groups),
        options,
    ))
}
