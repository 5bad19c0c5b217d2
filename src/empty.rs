use crate::histogram::HistogramSet;
use crate::stats::total_weight;
use std::collections::BTreeMap;

/// Flag, per element, the lumisections whose total weight is at most `threshold`.
pub fn check_empty_lss(data: &HistogramSet, threshold: f64) -> BTreeMap<String, Vec<bool>> {
    data.iter()
        .map(|(me, hist)| {
            let empty_lss = hist
                .counts()
                .iter()
                .map(|row| total_weight(row) <= threshold)
                .collect();
            (me.clone(), empty_lss)
        })
        .collect()
}
