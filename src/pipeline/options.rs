//! Options shared by the numeric and categorical IV calculations

use serde::{Deserialize, Serialize};

/// Default number of quantile bins for numeric features
pub const DEFAULT_BINS: usize = 10;

/// Default label reported alongside the IV when none is given
pub const DEFAULT_FEATURE_NAME: &str = "feature";

/// Options for a single IV calculation.
///
/// Deserializes from partial documents; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvOptions {
    /// Label for the feature, returned with the total IV
    pub feature_name: String,
    /// Return the full per-group table instead of the (name, IV) summary
    pub return_table: bool,
}

impl Default for IvOptions {
    fn default() -> Self {
        Self {
            feature_name: DEFAULT_FEATURE_NAME.to_string(),
            return_table: false,
        }
    }
}

impl IvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature_name(mut self, feature_name: impl Into<String>) -> Self {
        self.feature_name = feature_name.into();
        self
    }

    pub fn with_return_table(mut self, return_table: bool) -> Self {
        self.return_table = return_table;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = IvOptions::default();
        assert_eq!(opts.feature_name, "feature");
        assert!(!opts.return_table);
    }

    #[test]
    fn test_builder() {
        let opts = IvOptions::new()
            .with_feature_name("age")
            .with_return_table(true);
        assert_eq!(opts.feature_name, "age");
        assert!(opts.return_table);
    }

    #[test]
    fn test_deserialize_partial_document() {
        let opts: IvOptions = serde_json::from_str(r#"{"return_table": true}"#).unwrap();
        assert_eq!(opts.feature_name, "feature");
        assert!(opts.return_table);

        let opts: IvOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, IvOptions::default());
    }
}
