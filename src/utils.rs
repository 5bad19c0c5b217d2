use anyhow::{Context, Result, bail};
use std::{fmt::Debug, ops::RangeBounds};

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }

    Ok(())
}

/// Check that a vector holds strictly ascending finite values.
pub fn check_axis(vec: &[f64]) -> Result<()> {
    if vec.is_empty() {
        bail!("axis must have at least one value");
    }
    if vec.iter().any(|ele| !ele.is_finite()) {
        bail!("axis must have only finite values");
    }
    if let Some(i_ele) = vec.windows(2).position(|pair| pair[0] >= pair[1]) {
        bail!("axis must be strictly ascending, but is not at index {}", i_ele + 1);
    }

    Ok(())
}

/// Check that a vector holds finite non-negative weights of the expected length.
pub fn check_weights(vec: &[f64], exp_len: usize) -> Result<()> {
    let len = vec.len();
    if len != exp_len {
        bail!("vector length must be {exp_len}, but is {len}");
    }
    if vec.iter().any(|&ele| !ele.is_finite() || ele < 0.0) {
        bail!("vector must have only finite non-negative elements");
    }

    Ok(())
}

pub fn check_mat(mat: &[Vec<f64>], exp_n_cols: usize) -> Result<()> {
    for (i_row, row) in mat.iter().enumerate() {
        check_weights(row, exp_n_cols).with_context(|| format!("invalid row {i_row}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_num_rejects_out_of_range() {
        assert!(check_num(0.5, 0.0..1.0).is_ok());
        assert!(check_num(1.0, 0.0..1.0).is_err());
        assert!(check_num(-1.0, 0.0..).is_err());
    }

    #[test]
    fn check_axis_requires_strict_order() {
        assert!(check_axis(&[1.0, 2.0, 3.0]).is_ok());
        assert!(check_axis(&[1.0, 1.0]).is_err());
        assert!(check_axis(&[2.0, 1.0]).is_err());
        assert!(check_axis(&[]).is_err());
        assert!(check_axis(&[0.0, f64::NAN]).is_err());
    }

    #[test]
    fn check_mat_reports_ragged_and_negative_rows() {
        assert!(check_mat(&[vec![0.0, 1.0], vec![2.0, 3.0]], 2).is_ok());
        assert!(check_mat(&[vec![0.0, 1.0], vec![2.0]], 2).is_err());
        assert!(check_mat(&[vec![0.0, -1.0]], 2).is_err());
        assert!(check_mat(&[vec![f64::INFINITY, 1.0]], 2).is_err());
    }
}
