use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive statistics for one metric column, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricStats {
    /// `None` when the column held no numeric cells.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Some(Self {
            mean: round2(mean),
            median: round2(median),
            min: round2(sorted[0]),
            max: round2(sorted[count - 1]),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Row count plus per-metric statistics for one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStats {
    pub count: usize,
    #[serde(flatten)]
    pub metrics: BTreeMap<&'static str, MetricStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub by_platform: BTreeMap<String, PlatformStats>,
    pub overall: BTreeMap<&'static str, MetricStats>,
}

/// Collects numeric samples per metric while rows stream in.
#[derive(Debug, Default)]
pub(crate) struct MetricSamples {
    rows: usize,
    values: BTreeMap<&'static str, Vec<f64>>,
}

impl MetricSamples {
    pub(crate) fn record_row(&mut self) {
        self.rows += 1;
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn push(&mut self, metric: &'static str, value: f64) {
        self.values.entry(metric).or_default().push(value);
    }

    pub(crate) fn metric_stats(&self) -> BTreeMap<&'static str, MetricStats> {
        self.values
            .iter()
            .filter_map(|(metric, values)| {
                MetricStats::from_values(values).map(|stats| (*metric, stats))
            })
            .collect()
    }

    pub(crate) fn platform_stats(&self) -> PlatformStats {
        PlatformStats {
            count: self.rows,
            metrics: self.metric_stats(),
        }
    }
}
