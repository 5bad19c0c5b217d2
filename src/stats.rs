//! Weighted moments of a single histogram row.
//!
//! Rows with zero total weight, or whose sums overflow, yield `0.0` for
//! every moment instead of NaN or infinity.

/// Sum of the bin contents of a row.
pub fn total_weight(weights: &[f64]) -> f64 {
    weights.iter().sum()
}

/// Weighted mean of the bin centers.
pub fn weighted_mean(weights: &[f64], bin_centers: &[f64]) -> f64 {
    let sum_of_weights = total_weight(weights);
    if sum_of_weights == 0.0 {
        return 0.0;
    }
    let weighted_sum: f64 = weights
        .iter()
        .zip(bin_centers)
        .map(|(&weight, &center)| weight * center)
        .sum();
    finite_or_zero(weighted_sum / sum_of_weights)
}

/// Population weighted variance around `mean`.
///
/// No Bessel correction is applied, so the estimate is biased when `mean`
/// comes from the same weights.
pub fn weighted_var(weights: &[f64], bin_centers: &[f64], mean: f64) -> f64 {
    let sum_of_weights = total_weight(weights);
    if sum_of_weights == 0.0 {
        return 0.0;
    }
    let sqrd_devs: f64 = weights
        .iter()
        .zip(bin_centers)
        .map(|(&weight, &center)| weight * (center - mean).powi(2))
        .sum();
    finite_or_zero(sqrd_devs / sum_of_weights)
}

/// Square root of [`weighted_var`].
pub fn weighted_std_dev(weights: &[f64], bin_centers: &[f64], mean: f64) -> f64 {
    weighted_var(weights, bin_centers, mean).sqrt()
}

/// Bin center of the largest bin content, first occurrence on ties.
///
/// `bin_centers` must hold one value per weight.
pub fn mode(weights: &[f64], bin_centers: &[f64]) -> f64 {
    let mut i_max = 0;
    for (i_bin, &weight) in weights.iter().enumerate() {
        if weight > weights[i_max] {
            i_max = i_bin;
        }
    }
    bin_centers[i_max]
}

fn finite_or_zero(val: f64) -> f64 {
    if val.is_finite() { val } else { 0.0 }
}

/// Standard error of the mean normalized by the number of bins.
///
/// This divides by `sqrt(n_bins)`, not by the square root of the number of
/// entries.
pub fn std_err_on_mean(std_dev: f64, n_bins: usize) -> f64 {
    std_dev / (n_bins as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTERS: [f64; 3] = [1.0, 2.0, 3.0];

    #[test]
    fn zero_weight_row_gives_zero_moments() {
        let weights = [0.0; 3];
        let mean = weighted_mean(&weights, &CENTERS);
        assert_eq!(mean, 0.0);
        assert_eq!(weighted_std_dev(&weights, &CENTERS, mean), 0.0);
    }

    #[test]
    fn single_bin_row_has_no_spread() {
        let weights = [0.0, 0.0, 7.0];
        let mean = weighted_mean(&weights, &CENTERS);
        assert_eq!(mean, 3.0);
        assert_eq!(weighted_std_dev(&weights, &CENTERS, mean), 0.0);
    }

    #[test]
    fn uniform_row_has_population_variance() {
        let weights = [1.0, 1.0, 1.0];
        let mean = weighted_mean(&weights, &CENTERS);
        assert_eq!(mean, 2.0);
        assert_eq!(weighted_var(&weights, &CENTERS, mean), 2.0 / 3.0);
    }

    #[test]
    fn overflowing_row_gives_zero_moments() {
        let weights = [f64::MAX, f64::MAX];
        let centers = [1.0, 2.0];
        let mean = weighted_mean(&weights, &centers);
        let std_dev = weighted_std_dev(&weights, &centers, mean);
        assert_eq!(mean, 0.0);
        assert_eq!(std_dev, 0.0);
        assert_eq!(std_err_on_mean(std_dev, 2), 0.0);
    }

    #[test]
    fn mode_prefers_lowest_index_on_ties() {
        assert_eq!(mode(&[0.0, 5.0, 5.0], &CENTERS), 2.0);
        assert_eq!(mode(&[0.0, 0.0, 0.0], &CENTERS), 1.0);
        assert_eq!(mode(&[1.0, 0.0, 3.0], &CENTERS), 3.0);
    }

    #[test]
    fn std_err_on_mean_uses_bin_count() {
        assert_eq!(std_err_on_mean(3.0, 9), 1.0);
        assert_eq!(std_err_on_mean(0.0, 4), 0.0);
    }
}
