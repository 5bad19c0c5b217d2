//! Per-element histogram matrices.

use crate::utils::{check_axis, check_mat};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Mapping from monitoring-element name to its histogram matrix.
pub type HistogramSet = BTreeMap<String, MeHistogram>;

/// Histogram matrix of a single monitoring element.
///
/// Each row of `counts` holds the bin contents of one lumisection, in
/// lumisection order. Each column corresponds to the bin center at the same
/// index of `bin_centers`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeHistogram {
    counts: Vec<Vec<f64>>,
    bin_centers: Vec<f64>,
}

impl MeHistogram {
    /// Create a new histogram matrix.
    ///
    /// # Errors
    /// Returns an error if the bin centers are not strictly ascending finite
    /// values, or if any row has a different length than the bin centers or
    /// holds negative or non-finite counts.
    pub fn new(counts: Vec<Vec<f64>>, bin_centers: Vec<f64>) -> Result<Self> {
        check_axis(&bin_centers).context("invalid bin centers")?;
        check_mat(&counts, bin_centers.len()).context("invalid counts")?;
        Ok(Self {
            counts,
            bin_centers,
        })
    }

    pub fn counts(&self) -> &[Vec<f64>] {
        &self.counts
    }

    pub fn bin_centers(&self) -> &[f64] {
        &self.bin_centers
    }

    /// Number of lumisections (rows).
    pub fn n_ls(&self) -> usize {
        self.counts.len()
    }

    /// Number of bins (columns).
    pub fn n_bins(&self) -> usize {
        self.bin_centers.len()
    }

    /// Build a histogram with the same bin centers and every row divided by its divisor.
    ///
    /// A zero divisor yields an all-zero row. Callers must supply one
    /// non-negative divisor per row.
    ///
    /// # Errors
    /// Returns an error if a quotient is not finite.
    pub(crate) fn divide_rows(&self, divisors: &[f64]) -> Result<Self> {
        let counts = self
            .counts
            .iter()
            .zip(divisors)
            .map(|(row, &divisor)| {
                if divisor == 0.0 {
                    vec![0.0; row.len()]
                } else {
                    row.iter().map(|&val| val / divisor).collect()
                }
            })
            .collect();
        Self::new(counts, self.bin_centers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_consistent_shapes() {
        let hist = MeHistogram::new(vec![vec![0.0, 1.0, 2.0]; 4], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(hist.n_ls(), 4);
        assert_eq!(hist.n_bins(), 3);
    }

    #[test]
    fn new_accepts_zero_lumisections() {
        let hist = MeHistogram::new(Vec::new(), vec![0.5]).unwrap();
        assert_eq!(hist.n_ls(), 0);
        assert_eq!(hist.n_bins(), 1);
    }

    #[test]
    fn new_rejects_ragged_counts() {
        let err = MeHistogram::new(vec![vec![0.0, 1.0], vec![1.0]], vec![1.0, 2.0]).unwrap_err();
        assert!(format!("{err:#}").contains("invalid row 1"));
    }

    #[test]
    fn new_rejects_unordered_bin_centers() {
        assert!(MeHistogram::new(vec![vec![0.0, 1.0]], vec![2.0, 1.0]).is_err());
    }

    #[test]
    fn divide_rows_keeps_shape() {
        let hist = MeHistogram::new(vec![vec![2.0, 4.0], vec![1.0, 1.0]], vec![1.0, 2.0]).unwrap();
        let divided = hist.divide_rows(&[2.0, 0.0]).unwrap();
        assert_eq!(divided.counts(), &[vec![1.0, 2.0], vec![0.0, 0.0]]);
        assert_eq!(divided.bin_centers(), hist.bin_centers());
    }

    #[test]
    fn divide_rows_gives_exact_quotients() {
        let hist = MeHistogram::new(vec![vec![3.0, 1.0], vec![5.0, 2.0]], vec![1.0, 2.0]).unwrap();
        let divided = hist.divide_rows(&[10.0, 7.0]).unwrap();
        assert_eq!(divided.counts()[0], [3.0 / 10.0, 1.0 / 10.0]);
        assert_eq!(divided.counts()[0][0], 0.3);
        assert_eq!(divided.counts()[1], [5.0 / 7.0, 2.0 / 7.0]);
    }

    #[test]
    fn divide_rows_rejects_overflow() {
        let hist = MeHistogram::new(vec![vec![0.0, 1.0, 0.0]], vec![1.0, 2.0, 3.0]).unwrap();
        assert!(hist.divide_rows(&[1e-310]).is_err());
    }
}
