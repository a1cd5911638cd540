//! Equal-frequency (quantile) binning for numeric features
//!
//! Edges are the linearly interpolated quantiles of the observed values at
//! `q = i / bins`. Duplicate edges are dropped, so heavily tied features end
//! up with fewer bins than requested instead of failing.

use log::debug;

use crate::error::IvError;

/// Quantile bin edges fitted on a numeric feature.
///
/// Bins are right-closed intervals `(edge[j-1], edge[j]]`, except the first
/// which also includes its lower edge. Bin indices are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileBins {
    edges: Vec<f64>,
    requested: usize,
}

impl QuantileBins {
    /// Fit edges on values already sorted ascending and free of non-finite values.
    ///
    /// Fails with `InvalidArgument` when room for `bins + 1` edges cannot be
    /// allocated.
    pub(crate) fn from_sorted(sorted: &[f64], bins: usize) -> Result<Self, IvError> {
        if sorted.is_empty() {
            return Ok(Self {
                edges: Vec::new(),
                requested: bins,
            });
        }

        let capacity = bins.checked_add(1).ok_or_else(|| IvError::bins_too_large(bins))?;
        let mut edges: Vec<f64> = Vec::new();
        edges
            .try_reserve_exact(capacity)
            .map_err(|_| IvError::bins_too_large(bins))?;

        let step = 1.0 / bins as f64;
        for i in 0..=bins {
            let q = if i == bins { 1.0 } else { i as f64 * step };
            let edge = interpolated_quantile(sorted, q);
            if edges.last() != Some(&edge) {
                edges.push(edge);
            }
        }

        let achieved = (edges.len() - 1).max(1);
        if achieved < bins {
            debug!(
                "Reduced quantile bins from {} to {} (duplicate edges dropped)",
                bins, achieved
            );
        }

        Ok(Self {
            edges,
            requested: bins,
        })
    }

    /// Bin edges after duplicates were dropped
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins that was asked for
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of bins actually available (0 when fitted on no values)
    pub fn len(&self) -> usize {
        if self.edges.is_empty() {
            0
        } else {
            (self.edges.len() - 1).max(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// 1-based bin index for `value`, or `None` if the value is missing or
    /// outside the fitted range.
    pub fn assign(&self, value: f64) -> Option<usize> {
        let (first, last) = match (self.edges.first(), self.edges.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return None,
        };
        if !value.is_finite() || value < first || value > last {
            return None;
        }

        // Count of edges strictly below the value; the lowest edge maps to bin 1.
        let below = self.edges.partition_point(|&edge| edge < value);
        Some(below.max(1))
    }
}

/// Fit quantile bins on a feature, ignoring missing (non-finite) values.
pub fn quantile_bins(feature: &[f64], bins: usize) -> Result<QuantileBins, IvError> {
    if bins < 1 {
        return Err(IvError::invalid_bins(bins));
    }

    let mut sorted: Vec<f64> = feature.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    QuantileBins::from_sorted(&sorted, bins)
}

/// Linear-interpolation quantile of a sorted, non-empty slice.
fn interpolated_quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    lerp(sorted[lower], sorted[upper], position - lower as f64)
}

/// Interpolate from whichever end is closer so that `t = 1` returns `b` exactly.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolated_quantile() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(interpolated_quantile(&sorted, 0.0), 1.0);
        assert_eq!(interpolated_quantile(&sorted, 1.0), 10.0);
        assert!((interpolated_quantile(&sorted, 0.2) - 2.8).abs() < 1e-12);
        assert!((interpolated_quantile(&sorted, 0.5) - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_equal_frequency_edges() {
        let feature: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let bins = quantile_bins(&feature, 5).unwrap();

        assert_eq!(bins.len(), 5);
        assert_eq!(bins.edges().len(), 6);
        assert_eq!(bins.assign(1.0), Some(1));
        assert_eq!(bins.assign(2.0), Some(1));
        assert_eq!(bins.assign(3.0), Some(2));
        assert_eq!(bins.assign(10.0), Some(5));
    }

    #[test]
    fn test_duplicate_edges_are_dropped() {
        // Mostly ties: only 0.0 and 1.0 appear
        let feature = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
        let bins = quantile_bins(&feature, 10).unwrap();

        assert!(bins.len() < 10, "Expected fewer bins, got {}", bins.len());
        assert_eq!(bins.requested(), 10);
        for w in bins.edges().windows(2) {
            assert!(w[0] < w[1], "Edges must be strictly increasing: {:?}", bins.edges());
        }
        assert_eq!(bins.assign(0.0), Some(1));
    }

    #[test]
    fn test_constant_feature_single_bin() {
        let bins = quantile_bins(&[3.0; 6], 4).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins.edges(), &[3.0]);
        assert_eq!(bins.assign(3.0), Some(1));
    }

    #[test]
    fn test_missing_values_ignored() {
        let feature = [f64::NAN, 1.0, 2.0, f64::INFINITY, 3.0];
        let bins = quantile_bins(&feature, 2).unwrap();

        assert_eq!(bins.edges(), &[1.0, 2.0, 3.0]);
        assert_eq!(bins.assign(f64::NAN), None);
        assert_eq!(bins.assign(f64::INFINITY), None);
        assert_eq!(bins.assign(0.5), None);
    }

    #[test]
    fn test_empty_feature() {
        let bins = quantile_bins(&[], 10).unwrap();
        assert!(bins.is_empty());
        assert_eq!(bins.len(), 0);
        assert_eq!(bins.assign(1.0), None);
    }

    #[test]
    fn test_unallocatable_bins_rejected() {
        for bins in [usize::MAX, usize::MAX / 2] {
            let result = quantile_bins(&[1.0, 2.0, 3.0, 4.0], bins);
            assert!(
                matches!(result, Err(IvError::InvalidArgument { name: "bins", .. })),
                "bins={} should be rejected, got {:?}",
                bins,
                result
            );
        }
    }

    #[test]
    fn test_more_bins_than_values() {
        let bins = quantile_bins(&[0.0, 10.0], 4).unwrap();
        assert_eq!(bins.edges(), &[0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(bins.assign(0.0), Some(1));
        assert_eq!(bins.assign(10.0), Some(4));
    }

    #[test]
    fn test_zero_bins_rejected() {
        let result = quantile_bins(&[1.0, 2.0], 0);
        assert!(matches!(result, Err(IvError::InvalidArgument { name: "bins", .. })));
    }
}
