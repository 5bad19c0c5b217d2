//! Conversion of tabular monitoring records into histogram matrices.

use crate::histogram::{HistogramSet, MeHistogram};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One tabular record: the histogram of one monitoring element in one lumisection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Monitoring element name.
    pub me: String,
    /// Run number.
    pub run_number: u32,
    /// Lumisection number.
    pub ls_number: u32,

    /// Lower edge of the first bin.
    pub x_min: f64,
    /// Upper edge of the last bin.
    pub x_max: f64,
    /// Number of bins, excluding underflow and overflow.
    pub x_bin: usize,

    /// Bin contents, optionally surrounded by underflow and overflow bins.
    pub data: Vec<f64>,
}

/// Group tabular records into one histogram matrix per monitoring element.
///
/// Rows of each element are ordered by lumisection number. Underflow and
/// overflow bins are dropped when `data` carries them.
///
/// # Errors
/// Returns an error if the records of an element disagree on run or axis,
/// repeat a lumisection, or hold invalid bin contents.
pub fn generate_me_dict(rows: &[TableRow]) -> Result<HistogramSet> {
    let mut grouped: BTreeMap<&str, Vec<&TableRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.me.as_str()).or_default().push(row);
    }

    let mut data = HistogramSet::new();
    for (me, mut me_rows) in grouped {
        me_rows.sort_by_key(|row| row.ls_number);
        let hist = build_histogram(&me_rows).with_context(|| format!("invalid records of {me}"))?;
        log::debug!("{me}: {} lumisections, {} bins", hist.n_ls(), hist.n_bins());
        data.insert(me.to_string(), hist);
    }

    Ok(data)
}

fn build_histogram(me_rows: &[&TableRow]) -> Result<MeHistogram> {
    let first = me_rows.first().context("no records")?;
    let bin_centers = compute_bin_centers(first.x_min, first.x_max, first.x_bin)?;

    let mut counts = Vec::with_capacity(me_rows.len());
    for (i_row, row) in me_rows.iter().enumerate() {
        if row.run_number != first.run_number {
            bail!(
                "run number must be {}, but is {} at lumisection {}",
                first.run_number,
                row.run_number,
                row.ls_number
            );
        }
        if (row.x_min, row.x_max, row.x_bin) != (first.x_min, first.x_max, first.x_bin) {
            bail!("axis differs from the first record at lumisection {}", row.ls_number);
        }
        if i_row > 0 && me_rows[i_row - 1].ls_number == row.ls_number {
            bail!("lumisection {} appears more than once", row.ls_number);
        }
        counts.push(strip_flow_bins(&row.data, row.x_bin).with_context(|| {
            format!("invalid bin contents at lumisection {}", row.ls_number)
        })?);
    }

    MeHistogram::new(counts, bin_centers)
}

fn compute_bin_centers(x_min: f64, x_max: f64, x_bin: usize) -> Result<Vec<f64>> {
    if x_bin == 0 {
        bail!("number of bins must be at least 1");
    }
    if !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
        bail!("axis range must be finite and ascending, but is [{x_min}, {x_max}]");
    }
    let width = (x_max - x_min) / x_bin as f64;
    Ok((0..x_bin)
        .map(|i_bin| x_min + (i_bin as f64 + 0.5) * width)
        .collect())
}

fn strip_flow_bins(data: &[f64], x_bin: usize) -> Result<Vec<f64>> {
    let len = data.len();
    if len == x_bin {
        Ok(data.to_vec())
    } else if len == x_bin + 2 {
        Ok(data[1..=x_bin].to_vec())
    } else {
        bail!("data length must be {x_bin} or {}, but is {len}", x_bin + 2);
    }
}
