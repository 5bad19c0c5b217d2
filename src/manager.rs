use crate::chart::{ChartSink, MsgpackSink, plot_trends};
use crate::config::Config;
use crate::table::TableRow;
use crate::trends::{TrendComputer, TrendSet};
use anyhow::{Context, Result};
use glob::glob;
use rmp_serde::{decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

pub struct Manager {
    run_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(run_dir: P) -> Result<Self> {
        let run_dir = run_dir.as_ref().to_path_buf();

        let cfg = Config::from_file(run_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { run_dir, cfg })
    }

    pub fn compute_trends(&self) -> Result<()> {
        let histograms_file = self.histograms_file();
        let rows: Vec<TableRow> = read_msgpack(&histograms_file)
            .with_context(|| format!("failed to load {histograms_file:?}"))?;
        log::info!("loaded {histograms_file:?}");

        let rates_file = self.trigger_rates_file();
        let trigger_rates: Option<Vec<f64>> = if rates_file.exists() {
            let trigger_rates = read_msgpack(&rates_file)
                .with_context(|| format!("failed to load {rates_file:?}"))?;
            log::info!("loaded {rates_file:?}");
            Some(trigger_rates)
        } else {
            None
        };

        let computer = TrendComputer::new(self.cfg.trends.empty_threshold);
        let trends = computer
            .compute(rows, trigger_rates.as_deref())
            .context("failed to compute trends")?;

        let trends_file = self.trends_file();
        write_msgpack(&trends_file, &trends)
            .with_context(|| format!("failed to save {trends_file:?}"))?;
        log::info!("saved {trends_file:?}");

        Ok(())
    }

    pub fn plot_trends(&self, me: &str) -> Result<()> {
        let trends_file = self.trends_file();
        let trends: TrendSet = read_msgpack(&trends_file)
            .with_context(|| format!("failed to load {trends_file:?}"))?;

        let chart = plot_trends(&trends, me, &self.cfg.plot.to_options())
            .context("failed to build chart")?;

        let mut sink = MsgpackSink::new(self.chart_file(me));
        sink.render(&chart).context("failed to render chart")?;

        Ok(())
    }

    pub fn clean_run(&self) -> Result<()> {
        let trends_file = self.trends_file();
        if trends_file.exists() {
            fs::remove_file(&trends_file)
                .with_context(|| format!("failed to remove {trends_file:?}"))?;
            log::info!("removed {trends_file:?}");
        }

        let pattern = self.run_dir.join("chart-*.msgpack");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        for file in glob(pattern)
            .context("failed to glob chart files")?
            .filter_map(Result::ok)
        {
            fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
            log::info!("removed {file:?}");
        }

        Ok(())
    }

    fn histograms_file(&self) -> PathBuf {
        self.run_dir.join("histograms.msgpack")
    }

    fn trigger_rates_file(&self) -> PathBuf {
        self.run_dir.join("trigger-rates.msgpack")
    }

    fn trends_file(&self) -> PathBuf {
        self.run_dir.join("trends.msgpack")
    }

    fn chart_file(&self, me: &str) -> PathBuf {
        self.run_dir.join(format!("chart-{}.msgpack", sanitize_name(me)))
    }
}

fn sanitize_name(me: &str) -> String {
    me.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn read_msgpack<T: DeserializeOwned, P: AsRef<Path>>(file: P) -> Result<T> {
    let file = file.as_ref();
    let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let mut reader = BufReader::new(file);
    let value = decode::from_read(&mut reader).context("failed to deserialize value")?;
    Ok(value)
}

fn write_msgpack<T: Serialize, P: AsRef<Path>>(file: P, value: &T) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = BufWriter::new(file);
    encode::write(&mut writer, value).context("failed to serialize value")?;
    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_name_replaces_separators() {
        assert_eq!(
            sanitize_name("PixelPhase1/Tracks/charge_PXBarrel"),
            "PixelPhase1_Tracks_charge_PXBarrel"
        );
        assert_eq!(sanitize_name("a b.c"), "a_b_c");
    }
}
