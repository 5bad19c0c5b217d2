//! Per-lumisection trends of data quality monitoring histograms.
//!
//! [`compute_trends`] turns one histogram matrix per monitoring element into
//! weighted mean, standard deviation, mode, standard error and empty flags
//! for every lumisection. [`plot_trends`] describes the result as an
//! interactive chart.

pub mod chart;
pub mod config;
pub mod empty;
pub mod histogram;
pub mod manager;
pub mod normalize;
pub mod stats;
pub mod table;
pub mod trends;
mod utils;

pub use chart::{Chart, ChartSink, PlotOptions, plot_trends};
pub use histogram::{HistogramSet, MeHistogram};
pub use table::{TableRow, generate_me_dict};
pub use trends::{Stat, TrendComputer, TrendInput, TrendRecord, TrendSet, compute_trends};
