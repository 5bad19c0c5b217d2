//! Per-lumisection trends of monitoring elements.
//!
//! The computation runs as a pipeline of pure stages:
//! convert ([`generate_me_dict`]), normalize ([`trig_normalize`]),
//! aggregate ([`TrendComputer::aggregate`]) and flag empty lumisections
//! ([`check_empty_lss`]).

use crate::empty::check_empty_lss;
use crate::histogram::{HistogramSet, MeHistogram};
use crate::normalize::trig_normalize;
use crate::stats::{mode, std_err_on_mean, weighted_mean, weighted_std_dev};
use crate::table::{TableRow, generate_me_dict};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Statistic tracked for every lumisection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Mean,
    Stdev,
    Max,
    StdErrOnMean,
    EmptyLss,
}

impl Stat {
    pub const ALL: [Stat; 5] = [
        Stat::Mean,
        Stat::Stdev,
        Stat::Max,
        Stat::StdErrOnMean,
        Stat::EmptyLss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stat::Mean => "mean",
            Stat::Stdev => "stdev",
            Stat::Max => "max",
            Stat::StdErrOnMean => "std_err_on_mean",
            Stat::EmptyLss => "empty_lss",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .with_context(|| format!("unknown statistic {s:?}"))
    }
}

/// Trends of a single monitoring element, one value per lumisection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Weighted mean of the bin centers.
    pub mean: Vec<f64>,
    /// Weighted population standard deviation.
    pub stdev: Vec<f64>,
    /// Bin center of the fullest bin.
    pub max: Vec<f64>,
    /// Standard deviation divided by the square root of the number of bins.
    pub std_err_on_mean: Vec<f64>,
    /// Lumisections with no weight above the empty threshold.
    pub empty_lss: Vec<bool>,
}

impl TrendRecord {
    /// Number of lumisections covered by the record.
    pub fn n_ls(&self) -> usize {
        self.mean.len()
    }

    /// Values of one statistic, with empty flags mapped to `1.0` and `0.0`.
    pub fn series(&self, stat: Stat) -> Vec<f64> {
        match stat {
            Stat::Mean => self.mean.clone(),
            Stat::Stdev => self.stdev.clone(),
            Stat::Max => self.max.clone(),
            Stat::StdErrOnMean => self.std_err_on_mean.clone(),
            Stat::EmptyLss => self
                .empty_lss
                .iter()
                .map(|&empty| if empty { 1.0 } else { 0.0 })
                .collect(),
        }
    }
}

/// Mapping from monitoring-element name to its trends.
pub type TrendSet = BTreeMap<String, TrendRecord>;

/// Data accepted by the trend computation.
#[derive(Debug, Clone)]
pub enum TrendInput {
    Histograms(HistogramSet),
    Table(Vec<TableRow>),
}

impl From<HistogramSet> for TrendInput {
    fn from(data: HistogramSet) -> Self {
        TrendInput::Histograms(data)
    }
}

impl From<Vec<TableRow>> for TrendInput {
    fn from(rows: Vec<TableRow>) -> Self {
        TrendInput::Table(rows)
    }
}

/// Trend computation settings.
#[derive(Debug, Clone, Default)]
pub struct TrendComputer {
    empty_threshold: f64,
}

impl TrendComputer {
    /// Create a computer flagging lumisections with total weight at most `empty_threshold`.
    pub fn new(empty_threshold: f64) -> Self {
        Self { empty_threshold }
    }

    /// Run the whole pipeline on `data`.
    ///
    /// # Errors
    /// Propagates conversion and normalization errors unmodified.
    pub fn compute<I: Into<TrendInput>>(
        &self,
        data: I,
        trigger_rates: Option<&[f64]>,
    ) -> Result<TrendSet> {
        let data = match data.into() {
            TrendInput::Histograms(data) => data,
            TrendInput::Table(rows) => {
                log::info!("converting {} records", rows.len());
                generate_me_dict(&rows)?
            }
        };

        let data = match trigger_rates {
            Some(trigger_rates) => {
                log::info!("normalizing by {} trigger rates", trigger_rates.len());
                trig_normalize(&data, trigger_rates)?
            }
            None => data,
        };

        log::info!("computing trends of {} elements", data.len());
        Ok(self.aggregate(&data))
    }

    /// Compute the trends of every element in `data`.
    pub fn aggregate(&self, data: &HistogramSet) -> TrendSet {
        let mut empty_lss = check_empty_lss(data, self.empty_threshold);

        data.iter()
            .map(|(me, hist)| {
                let mut record = compute_record(hist);
                record.empty_lss = empty_lss.remove(me).unwrap_or_default();
                log::debug!("{me}: computed {} lumisections", record.n_ls());
                (me.clone(), record)
            })
            .collect()
    }
}

/// Compute trends with the default empty threshold of zero.
///
/// # Errors
/// Propagates conversion and normalization errors unmodified.
pub fn compute_trends<I: Into<TrendInput>>(
    data: I,
    trigger_rates: Option<&[f64]>,
) -> Result<TrendSet> {
    TrendComputer::default().compute(data, trigger_rates)
}

fn compute_record(hist: &MeHistogram) -> TrendRecord {
    let bin_centers = hist.bin_centers();
    let n_bins = hist.n_bins();
    let n_ls = hist.n_ls();

    let mut record = TrendRecord {
        mean: Vec::with_capacity(n_ls),
        stdev: Vec::with_capacity(n_ls),
        max: Vec::with_capacity(n_ls),
        std_err_on_mean: Vec::with_capacity(n_ls),
        empty_lss: Vec::new(),
    };

    for row in hist.counts() {
        let mean = weighted_mean(row, bin_centers);
        let stdev = weighted_std_dev(row, bin_centers, mean);
        record.mean.push(mean);
        record.stdev.push(stdev);
        record.max.push(mode(row, bin_centers));
        record.std_err_on_mean.push(std_err_on_mean(stdev, n_bins));
    }

    record
}
