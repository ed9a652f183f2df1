use crate::models::Sample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub key: String,
    pub name: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Earliest and latest timestamp (ms).
    pub first: Option<i64>,
    pub last: Option<i64>,
}

/// Compute per-series statistics, ordered by key. Non-finite values are ignored.
pub fn series_summary(samples: &[&Sample]) -> Vec<SeriesSummary> {
    let mut groups: BTreeMap<&str, Vec<&Sample>> = BTreeMap::new();
    for s in samples {
        groups.entry(s.series_key.as_str()).or_default().push(*s);
    }

    let mut out = Vec::new();
    for (key, members) in groups {
        let mut vals: Vec<f64> = members
            .iter()
            .map(|s| s.value)
            .filter(|v| v.is_finite())
            .collect();
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(SeriesSummary {
            key: key.to_string(),
            name: members
                .first()
                .map(|s| s.display_name.clone())
                .unwrap_or_default(),
            count,
            min,
            max,
            mean,
            median,
            first: members.iter().map(|s| s.timestamp).min(),
            last: members.iter().map(|s| s.timestamp).max(),
        });
    }
    out
}
