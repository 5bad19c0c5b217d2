use crate::chart::PlotOptions;
use crate::trends::Stat;
use crate::utils::check_num;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Trend computation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendsConfig {
    /// Lumisections with total weight at or below this value are empty.
    pub empty_threshold: f64,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            empty_threshold: 0.0,
        }
    }
}

/// Chart parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub stats: Vec<Stat>,
    pub titles: Vec<String>,
    pub ylabels: Vec<String>,
    pub norm: bool,
    pub log: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        let opts = PlotOptions::default();
        Self {
            stats: opts.stats,
            titles: opts.titles,
            ylabels: opts.ylabels,
            norm: opts.norm,
            log: opts.log,
        }
    }
}

impl PlotConfig {
    pub fn to_options(&self) -> PlotOptions {
        PlotOptions {
            stats: self.stats.clone(),
            titles: self.titles.clone(),
            ylabels: self.ylabels.clone(),
            norm: self.norm,
            log: self.log,
        }
    }
}

/// Run configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub trends: TrendsConfig,
    pub plot: PlotConfig,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a [`Config`] from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_num(self.trends.empty_threshold, 0.0..f64::INFINITY)
            .context("invalid empty threshold")?;

        let n_stats = self.plot.stats.len();
        check_num(n_stats, 1..=Stat::ALL.len()).context("invalid number of plotted statistics")?;
        for (i_stat, stat) in self.plot.stats.iter().enumerate() {
            if self.plot.stats[..i_stat].contains(stat) {
                bail!("statistic {stat} is listed more than once");
            }
        }
        for (labels, what) in [(&self.plot.titles, "titles"), (&self.plot.ylabels, "ylabels")] {
            let len = labels.len();
            if len != 0 && len != n_stats {
                bail!("number of {what} must be 0 or {n_stats}, but is {len}");
            }
        }

        Ok(())
    }
}
