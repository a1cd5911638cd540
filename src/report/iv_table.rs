//! IV table rendering and JSON export

use std::fmt::Display;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use serde::Serialize;

use crate::pipeline::{IvStrength, IvTable};

const STAT_COLUMNS: [&str; 7] = ["count", "bads", "goods", "bads_pct", "goods_pct", "woe", "iv"];

fn stat_cell(value: f64) -> Cell {
    let cell = Cell::new(format!("{:.6}", value)).set_alignment(CellAlignment::Right);
    if value.is_finite() {
        cell
    } else {
        cell.fg(Color::Yellow)
    }
}

fn count_cell(value: usize) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn strength_color(strength: IvStrength) -> Color {
    match strength {
        IvStrength::Useless => Color::Red,
        IvStrength::Weak => Color::Yellow,
        IvStrength::Medium | IvStrength::Strong => Color::Green,
        IvStrength::Suspicious | IvStrength::Undefined => Color::Magenta,
    }
}

/// Build the comfy-table for an IV table, including a total row
pub fn build_iv_table<K: Display>(table: &IvTable<K>) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new(table.kind().key_column()).add_attribute(Attribute::Bold)];
    header.extend(
        STAT_COLUMNS
            .iter()
            .map(|name| Cell::new(name).add_attribute(Attribute::Bold)),
    );
    out.set_header(header);

    for row in table.rows() {
        out.add_row(vec![
            Cell::new(&row.key),
            count_cell(row.count),
            count_cell(row.bads),
            count_cell(row.goods),
            stat_cell(row.bads_pct),
            stat_cell(row.goods_pct),
            stat_cell(row.woe),
            stat_cell(row.iv),
        ]);
    }

    let summary = table.summary();
    let strength = summary.strength();
    out.add_row(vec![
        Cell::new("total").add_attribute(Attribute::Bold),
        count_cell(table.total_count()),
        count_cell(table.total_bads()),
        count_cell(table.total_goods()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(strength.to_string()).fg(strength_color(strength)),
        stat_cell(summary.iv).add_attribute(Attribute::Bold),
    ]);

    out
}

/// Render an IV table as text, titled with the feature name
pub fn render_iv_table<K: Display>(table: &IvTable<K>) -> String {
    format!(
        "Information Value: {}\n{}",
        table.feature_name(),
        build_iv_table(table)
    )
}

/// Export an IV table as pretty-printed JSON
///
/// Non-finite WoE/IV values are written as `null`.
pub fn iv_table_to_json<K: Serialize>(table: &IvTable<K>) -> Result<String> {
    serde_json::to_string_pretty(table)
        .with_context(|| format!("Failed to serialize IV table for '{}'", table.feature_name()))
}
