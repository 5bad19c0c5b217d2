use crate::histogram::HistogramSet;
use anyhow::{Context, Result, bail};

/// Divide the counts of every lumisection by its trigger rate.
///
/// Returns a new set; a zero rate yields an all-zero row.
///
/// # Errors
/// Returns an error if a rate is negative or non-finite, if the number of
/// rates differs from the number of lumisections of any element, or if a
/// normalized count overflows.
pub fn trig_normalize(data: &HistogramSet, trigger_rates: &[f64]) -> Result<HistogramSet> {
    if let Some(i_ls) = trigger_rates
        .iter()
        .position(|rate| !rate.is_finite() || *rate < 0.0)
    {
        bail!(
            "trigger rates must be finite and non-negative, but rate {i_ls} is {}",
            trigger_rates[i_ls]
        );
    }

    let mut normalized = HistogramSet::new();
    for (me, hist) in data {
        let n_ls = hist.n_ls();
        if n_ls != trigger_rates.len() {
            bail!(
                "{me} has {n_ls} lumisections, but {} trigger rates were given",
                trigger_rates.len()
            );
        }
        let hist = hist
            .divide_rows(trigger_rates)
            .with_context(|| format!("failed to normalize {me}"))?;
        normalized.insert(me.clone(), hist);
    }

    Ok(normalized)
}
