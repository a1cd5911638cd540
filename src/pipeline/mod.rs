//! Pipeline module - grouping, scoring and data frame adapters

pub mod binning;
pub mod frame;
pub mod iv;
pub mod options;
pub mod target;

pub use binning::*;
pub use frame::*;
pub use iv::*;
pub use options::*;
pub use target::*;
