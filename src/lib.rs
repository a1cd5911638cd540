//! ivcalc: Information Value Library
//!
//! Computes Weight of Evidence and Information Value of a single numeric
//! (quantile-binned) or categorical feature against a binary target.

pub mod error;
pub mod pipeline;
pub mod report;

pub use error::IvError;
pub use pipeline::{iv_categorical, iv_numeric, IvOptions, IvOutput, IvSummary, IvTable};
