//! Interactive chart descriptions of trends.
//!
//! A [`Chart`] lists one trace per statistic and a drop-down selector that
//! switches the visible trace. Rendering is left to a [`ChartSink`].

use crate::trends::{Stat, TrendSet};
use anyhow::{Context, Result, bail};
use rmp_serde::encode;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisType {
    Linear,
    Log,
}

/// One series of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    /// Lumisection numbers, starting at 1.
    pub x: Vec<usize>,
    pub y: Vec<f64>,
    pub mode: String,
    pub visible: bool,
}

/// Selector entry making one trace visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    /// Visibility of every trace once the button is selected.
    pub visible: Vec<bool>,
    pub title: String,
    pub y_title: String,
    pub y_axis_type: AxisType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub y_axis_type: AxisType,
    pub traces: Vec<Trace>,
    pub buttons: Vec<Button>,
}

/// Options of [`plot_trends`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Statistics to draw, in selector order.
    pub stats: Vec<Stat>,
    /// One title per statistic, or empty for the statistic names.
    pub titles: Vec<String>,
    /// One y-axis label per statistic, or empty for a placeholder.
    pub ylabels: Vec<String>,
    /// Divide each series by its own total.
    pub norm: bool,
    /// Use a logarithmic y-axis.
    pub log: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            stats: vec![Stat::Mean, Stat::Stdev, Stat::Max],
            titles: Vec::new(),
            ylabels: Vec::new(),
            norm: false,
            log: false,
        }
    }
}

const DEFAULT_YLABEL: &str = "YAXIS";

/// Build the chart of the trends of element `me`.
///
/// # Errors
/// Returns an error if `me` has no trends, if no statistic is requested or
/// one is requested twice, or if titles or labels do not match the
/// statistics one to one.
pub fn plot_trends(trends: &TrendSet, me: &str, opts: &PlotOptions) -> Result<Chart> {
    let record = trends
        .get(me)
        .with_context(|| format!("no trends for {me:?}"))?;

    let n_stats = opts.stats.len();
    if n_stats == 0 {
        bail!("at least one statistic must be plotted");
    }
    for (i_stat, stat) in opts.stats.iter().enumerate() {
        if opts.stats[..i_stat].contains(stat) {
            bail!("statistic {stat} is requested more than once");
        }
    }
    check_labels(&opts.titles, n_stats).context("invalid titles")?;
    check_labels(&opts.ylabels, n_stats).context("invalid y-axis labels")?;

    let y_axis_type = if opts.log {
        AxisType::Log
    } else {
        AxisType::Linear
    };

    let mut traces = Vec::with_capacity(n_stats);
    let mut buttons = Vec::with_capacity(n_stats);
    for (i_stat, &stat) in opts.stats.iter().enumerate() {
        let mut y = record.series(stat);
        if opts.norm {
            normalize_series(&mut y);
        }
        let x = (1..=y.len()).collect();

        traces.push(Trace {
            name: stat.to_string(),
            x,
            y,
            mode: "lines+markers".to_string(),
            visible: i_stat == 0,
        });

        buttons.push(Button {
            label: stat.to_string(),
            visible: (0..n_stats).map(|i_vis| i_vis == i_stat).collect(),
            title: label_or(&opts.titles, i_stat, stat.name()),
            y_title: label_or(&opts.ylabels, i_stat, DEFAULT_YLABEL),
            y_axis_type,
        });
    }

    Ok(Chart {
        title: buttons[0].title.clone(),
        x_title: "LS".to_string(),
        y_title: buttons[0].y_title.clone(),
        y_axis_type,
        traces,
        buttons,
    })
}

fn check_labels(labels: &[String], n_stats: usize) -> Result<()> {
    let len = labels.len();
    if len != 0 && len != n_stats {
        bail!("number of labels must be 0 or {n_stats}, but is {len}");
    }
    Ok(())
}

fn label_or(labels: &[String], idx: usize, default: &str) -> String {
    labels
        .get(idx)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

// A zero total leaves the series at zero.
fn normalize_series(y: &mut [f64]) {
    let total: f64 = y.iter().sum();
    if total == 0.0 {
        y.iter_mut().for_each(|val| *val = 0.0);
    } else {
        y.iter_mut().for_each(|val| *val /= total);
    }
}

/// Destination of finished charts.
pub trait ChartSink {
    fn render(&mut self, chart: &Chart) -> Result<()>;
}

/// Sink writing each chart MessagePack-encoded to a file.
pub struct MsgpackSink {
    file: PathBuf,
}

impl MsgpackSink {
    pub fn new<P: AsRef<Path>>(file: P) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
        }
    }
}

impl ChartSink for MsgpackSink {
    fn render(&mut self, chart: &Chart) -> Result<()> {
        let file = &self.file;
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write(&mut writer, chart).context("failed to serialize chart")?;
        writer.flush().context("failed to flush writer stream")?;
        log::info!("rendered {:?}", self.file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::TrendRecord;

    fn sample_trends() -> TrendSet {
        let mut trends = TrendSet::new();
        trends.insert(
            "ME1".to_string(),
            TrendRecord {
                mean: vec![1.0, 3.0],
                stdev: vec![0.0, 0.0],
                max: vec![2.0, 2.0],
                std_err_on_mean: vec![0.0, 0.0],
                empty_lss: vec![false, true],
            },
        );
        trends
    }

    #[derive(Default)]
    struct CollectSink {
        charts: Vec<Chart>,
    }

    impl ChartSink for CollectSink {
        fn render(&mut self, chart: &Chart) -> Result<()> {
            self.charts.push(chart.clone());
            Ok(())
        }
    }

    #[test]
    fn default_chart_shows_first_statistic() {
        let chart = plot_trends(&sample_trends(), "ME1", &PlotOptions::default()).unwrap();

        assert_eq!(chart.traces.len(), 3);
        assert_eq!(chart.title, "mean");
        assert_eq!(chart.y_title, "YAXIS");
        assert_eq!(chart.x_title, "LS");
        assert_eq!(chart.y_axis_type, AxisType::Linear);
        assert_eq!(chart.traces[0].x, [1, 2]);
        assert_eq!(chart.traces[0].y, [1.0, 3.0]);
        assert!(chart.traces[0].visible);
        assert!(!chart.traces[1].visible);
        assert_eq!(chart.buttons[2].label, "max");
        assert_eq!(chart.buttons[2].visible, [false, false, true]);
    }

    #[test]
    fn norm_divides_by_total_without_touching_trends() {
        let trends = sample_trends();
        let opts = PlotOptions {
            stats: vec![Stat::Mean, Stat::Stdev, Stat::EmptyLss],
            norm: true,
            log: true,
            ..PlotOptions::default()
        };
        let chart = plot_trends(&trends, "ME1", &opts).unwrap();

        assert_eq!(chart.traces[0].y, [0.25, 0.75]);
        assert_eq!(chart.traces[1].y, [0.0, 0.0]);
        assert_eq!(chart.traces[2].y, [0.0, 1.0]);
        assert_eq!(chart.y_axis_type, AxisType::Log);
        assert_eq!(trends, sample_trends());
    }

    #[test]
    fn custom_titles_follow_statistics() {
        let opts = PlotOptions {
            stats: vec![Stat::Max, Stat::Mean],
            titles: vec!["Mode".to_string(), "Mean".to_string()],
            ylabels: vec!["charge".to_string(), "charge".to_string()],
            ..PlotOptions::default()
        };
        let chart = plot_trends(&sample_trends(), "ME1", &opts).unwrap();

        assert_eq!(chart.title, "Mode");
        assert_eq!(chart.buttons[1].title, "Mean");
        assert_eq!(chart.buttons[1].y_title, "charge");
        assert_eq!(chart.traces[0].name, "max");
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let trends = sample_trends();
        assert!(plot_trends(&trends, "ME2", &PlotOptions::default()).is_err());

        let no_stats = PlotOptions {
            stats: Vec::new(),
            ..PlotOptions::default()
        };
        assert!(plot_trends(&trends, "ME1", &no_stats).is_err());

        let repeated = PlotOptions {
            stats: vec![Stat::Mean, Stat::Mean],
            ..PlotOptions::default()
        };
        assert!(plot_trends(&trends, "ME1", &repeated).is_err());

        let short_titles = PlotOptions {
            titles: vec!["only one".to_string()],
            ..PlotOptions::default()
        };
        assert!(plot_trends(&trends, "ME1", &short_titles).is_err());
    }

    #[test]
    fn sink_receives_chart() {
        let chart = plot_trends(&sample_trends(), "ME1", &PlotOptions::default()).unwrap();
        let mut sink = CollectSink::default();
        sink.render(&chart).unwrap();
        assert_eq!(sink.charts, [chart]);
    }
}
