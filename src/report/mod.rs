//! Report module - presenting IV tables

pub mod iv_table;

pub use iv_table::*;
