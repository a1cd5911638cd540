//! Error types for IV/WoE calculation.
//!
//! Only malformed input is an error. Degenerate statistics (a column with no
//! bads or no goods, a pure group) are valid results and surface as infinite
//! or NaN values in the output instead.

use thiserror::Error;

/// Errors raised before any group is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IvError {
    /// Target and feature sequences have different lengths.
    #[error("Input shape mismatch: target has {target_len} values, feature has {feature_len}")]
    InputShape {
        /// Length of the target sequence
        target_len: usize,
        /// Length of the feature sequence
        feature_len: usize,
    },

    /// An argument is outside its valid range (e.g. `bins < 1`).
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// A target value is neither 0 nor 1.
    #[error("Target must be binary (0/1): found {value} at index {index}")]
    NonBinaryTarget {
        /// Position of the first offending value
        index: usize,
        /// The offending value
        value: i32,
    },
}

impl IvError {
    pub(crate) fn invalid_bins(bins: usize) -> Self {
        IvError::InvalidArgument {
            name: "bins",
            reason: format!("must be at least 1, got {}", bins),
        }
    }

    pub(crate) fn bins_too_large(bins: usize) -> Self {
        IvError::InvalidArgument {
            name: "bins",
            reason: format!("{} is too large to allocate bin edges", bins),
        }
    }
}
