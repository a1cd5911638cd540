//! Shared test utilities and fixture generators

#![allow(dead_code)]

use ivcalc::pipeline::{IvOptions, IvTable};
use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;

/// Floating point tolerance for share sums
pub const EPS: f64 = 1e-9;

/// Options that ask for the full table
pub fn table_options(feature_name: &str) -> IvOptions {
    IvOptions::new()
        .with_feature_name(feature_name)
        .with_return_table(true)
}

/// Random binary target and a numeric feature loosely correlated with it
pub fn random_numeric_data(n: usize, seed: u64) -> (Vec<i32>, Vec<f64>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let target: Vec<i32> = (0..n)
        .map(|_| if rng.gen::<f64>() > 0.7 { 1 } else { 0 })
        .collect();
    let feature: Vec<f64> = target
        .iter()
        .map(|&t| {
            let base = if t == 1 { 60.0 } else { 40.0 };
            base + rng.gen::<f64>() * 40.0 - 20.0
        })
        .collect();
    (target, feature)
}

/// Random binary target and a categorical feature drawn from `levels`
pub fn random_categorical_data(n: usize, levels: &[&str], seed: u64) -> (Vec<i32>, Vec<String>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let target: Vec<i32> = (0..n).map(|_| rng.gen_range(0..2)).collect();
    let feature: Vec<String> = (0..n)
        .map(|_| levels[rng.gen_range(0..levels.len())].to_string())
        .collect();
    (target, feature)
}

/// A credit-style DataFrame with numeric, categorical and string-target columns
pub fn create_credit_dataframe() -> DataFrame {
    df! {
        "default" => [0i32, 1, 0, 0, 1, 0, 1, 0, 0, 1],
        "status" => ["good", "bad", "good", "good", "bad", "good", "bad", "good", "good", "bad"],
        "income" => [Some(55.0f64), Some(20.0), Some(61.0), None, Some(18.0), Some(72.0), Some(25.0), Some(48.0), Some(66.0), Some(30.0)],
        "grade" => [Some("A"), Some("C"), Some("A"), Some("B"), Some("C"), Some("B"), None, Some("A"), Some("B"), Some("C")],
    }
    .unwrap()
}

/// Assert the per-group totals and share sums hold for a table
pub fn assert_table_consistent<K>(table: &IvTable<K>, total_bads: usize, total_goods: usize) {
    let bads: usize = table.rows().iter().map(|r| r.bads).sum();
    let goods: usize = table.rows().iter().map(|r| r.goods).sum();
    assert_eq!(bads, total_bads, "Group bads must add up to the column total");
    assert_eq!(goods, total_goods, "Group goods must add up to the column total");

    for row in table.rows() {
        assert_eq!(row.count, row.bads + row.goods);
    }

    if total_bads > 0 {
        let bads_pct: f64 = table.rows().iter().map(|r| r.bads_pct).sum();
        assert!((bads_pct - 1.0).abs() < EPS, "bads_pct sums to {}", bads_pct);
    }
    if total_goods > 0 {
        let goods_pct: f64 = table.rows().iter().map(|r| r.goods_pct).sum();
        assert!((goods_pct - 1.0).abs() < EPS, "goods_pct sums to {}", goods_pct);
    }
}
