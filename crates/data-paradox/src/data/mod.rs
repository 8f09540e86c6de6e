//! Campaign CSV ingestion and claim-versus-data verification. The analysis core never calls
//! into this module; callers attach its output to a response as `data_verification`.

mod stats;
mod verification;

pub use stats::{DatasetSummary, MetricStats, PlatformStats};
pub use verification::{DataVerification, MatchType, PlatformMatch, Verification};

use serde::Serialize;
use stats::MetricSamples;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header names accepted as the grouping column, in priority order.
pub const PLATFORM_COLUMNS: &[&str] = &["platform", "channel", "ad_platform", "source", "medium"];

/// Canonical metric names and the header aliases that map onto them, in priority order.
pub const METRIC_ALIASES: &[(&str, &[&str])] = &[
    ("roas", &["roas", "return_on_ad_spend", "roi"]),
    ("ctr", &["ctr", "click_through_rate", "clickthrough_rate"]),
    ("cpc", &["cpc", "cost_per_click"]),
    ("cpa", &["cpa", "cost_per_acquisition", "cost_per_action"]),
    ("conversions", &["conversions", "conv", "purchases"]),
    ("spend", &["spend", "cost", "budget", "investment"]),
    ("revenue", &["revenue", "sales", "income"]),
];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read campaign data {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "could not find platform/channel column; expected one of: platform, channel, \
         ad_platform, source, medium"
    )]
    MissingPlatformColumn,
    #[error("campaign data contains no rows")]
    Empty,
}

/// Maps a detected metric to the header it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricColumn {
    pub metric: &'static str,
    pub column: String,
}

/// Parsed campaign data, reduced to the summary used for verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignDataset {
    rows: usize,
    columns: Vec<String>,
    platform_column: String,
    metric_columns: Vec<MetricColumn>,
    summary: DatasetSummary,
}

impl CampaignDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let platform_index =
            detect_platform_column(&columns).ok_or(DatasetError::MissingPlatformColumn)?;
        let metric_indices = detect_metric_columns(&columns);

        let mut overall = MetricSamples::default();
        let mut by_platform: BTreeMap<String, MetricSamples> = BTreeMap::new();

        for record in csv_reader.records() {
            let record = record?;
            overall.record_row();

            let platform = record.get(platform_index).unwrap_or_default();
            let mut group = if platform.is_empty() {
                None
            } else {
                let group = by_platform.entry(platform.to_string()).or_default();
                group.record_row();
                Some(group)
            };

            for &(metric, index) in &metric_indices {
                let Some(value) = record.get(index).and_then(parse_number) else {
                    continue;
                };
                overall.push(metric, value);
                if let Some(group) = group.as_mut() {
                    group.push(metric, value);
                }
            }
        }

        let summary = DatasetSummary {
            by_platform: by_platform
                .iter()
                .map(|(platform, samples)| (platform.clone(), samples.platform_stats()))
                .collect(),
            overall: overall.metric_stats(),
        };
        let rows = overall.rows();
        if rows == 0 {
            return Err(DatasetError::Empty);
        }

        let platform_column = columns[platform_index].clone();
        let metric_columns = metric_indices
            .iter()
            .map(|&(metric, index)| MetricColumn {
                metric,
                column: columns[index].clone(),
            })
            .collect();

        debug!(
            rows,
            platforms = summary.by_platform.len(),
            %platform_column,
            "campaign data parsed"
        );

        Ok(Self {
            rows,
            columns,
            platform_column,
            metric_columns,
            summary,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Header names as they appear in the file.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn platform_column(&self) -> &str {
        &self.platform_column
    }

    pub fn metric_columns(&self) -> &[MetricColumn] {
        &self.metric_columns
    }

    pub fn summary(&self) -> &DatasetSummary {
        &self.summary
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.metric_columns.iter().any(|column| column.metric == metric)
    }

    /// Checks platform names and `<metric> is|:|=|of|at <number>` statements in `claim`
    /// against the loaded figures.
    pub fn validate_claim(&self, claim: &str) -> DataVerification {
        let detected: Vec<&'static str> = self
            .metric_columns
            .iter()
            .map(|column| column.metric)
            .collect();
        verification::verify_claim(claim, &self.summary, &detected)
    }

    /// Per-platform mean of `metric`, highest first. Empty when the metric was not detected.
    pub fn platform_comparison(&self, metric: &str) -> Vec<PlatformMean> {
        let metric = metric.to_lowercase();
        if !self.has_metric(&metric) {
            return Vec::new();
        }

        let mut comparison: Vec<PlatformMean> = self
            .summary
            .by_platform
            .iter()
            .filter_map(|(platform, stats)| {
                stats.metrics.get(metric.as_str()).map(|stats| PlatformMean {
                    platform: platform.clone(),
                    mean: stats.mean,
                })
            })
            .collect();
        comparison.sort_by(|left, right| right.mean.total_cmp(&left.mean));
        comparison
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformMean {
    pub platform: String,
    pub mean: f64,
}

/// Case-insensitive lookup; a later header with the same lowercase name wins.
fn find_column(columns: &[String], name: &str) -> Option<usize> {
    columns
        .iter()
        .rposition(|column| column.eq_ignore_ascii_case(name))
}

fn detect_platform_column(columns: &[String]) -> Option<usize> {
    PLATFORM_COLUMNS
        .iter()
        .find_map(|name| find_column(columns, name))
}

fn detect_metric_columns(columns: &[String]) -> Vec<(&'static str, usize)> {
    METRIC_ALIASES
        .iter()
        .filter_map(|&(metric, aliases)| {
            aliases
                .iter()
                .find_map(|alias| find_column(columns, alias))
                .map(|index| (metric, index))
        })
        .collect()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMPAIGNS: &str = "\
Platform,Campaign,ROAS,Cost,Revenue
Google,Brand,1.5,100,150
Google,Generic,4.5,200,900
Meta,Prospecting,2.0,50,100
Meta,Retargeting,6.0,25,150
Meta,Lookalike,,10,
";

    fn dataset() -> CampaignDataset {
        CampaignDataset::from_reader(CAMPAIGNS.as_bytes()).expect("campaign csv parses")
    }

    #[test]
    fn detects_platform_and_metric_columns_case_insensitively() {
        let data = dataset();
        assert_eq!(data.rows(), 5);
        assert_eq!(data.platform_column(), "Platform");
        let metrics: Vec<(&str, &str)> = data
            .metric_columns()
            .iter()
            .map(|column| (column.metric, column.column.as_str()))
            .collect();
        assert_eq!(
            metrics,
            vec![("roas", "ROAS"), ("spend", "Cost"), ("revenue", "Revenue")]
        );
        assert!(!data.has_metric("ctr"));
    }

    #[test]
    fn summarizes_per_platform_and_overall_skipping_blank_cells() {
        let data = dataset();
        let summary = data.summary();

        let google = &summary.by_platform["Google"];
        assert_eq!(google.count, 2);
        assert_eq!(google.metrics["roas"].mean, 3.0);
        assert_eq!(google.metrics["roas"].median, 3.0);

        let meta = &summary.by_platform["Meta"];
        assert_eq!(meta.count, 3);
        assert_eq!(meta.metrics["roas"].mean, 4.0);
        assert_eq!(meta.metrics["roas"].max, 6.0);
        assert_eq!(meta.metrics["revenue"].min, 100.0);

        assert_eq!(summary.overall["roas"].mean, 3.5);
        assert_eq!(summary.overall["spend"].max, 200.0);
    }

    #[test]
    fn platform_comparison_sorts_means_descending() {
        let ranked: Vec<(String, f64)> = dataset()
            .platform_comparison("ROAS")
            .into_iter()
            .map(|entry| (entry.platform, entry.mean))
            .collect();
        assert_eq!(
            ranked,
            vec![("Meta".to_string(), 4.0), ("Google".to_string(), 3.0)]
        );
        assert!(dataset().platform_comparison("ctr").is_empty());
    }

    #[test]
    fn validate_claim_detects_platforms_and_metric_values() {
        let verification = dataset().validate_claim("Meta ROAS is 5.9 so we should scale it.");
        assert!(verification.verified);
        assert_eq!(verification.verifications.len(), 2);

        match &verification.verifications[0] {
            Verification::PlatformDetected { platform, stats } => {
                assert_eq!(platform, "Meta");
                assert_eq!(stats.count, 3);
            }
            other => panic!("expected platform detection, got {other:?}"),
        }
        match &verification.verifications[1] {
            Verification::MetricClaim {
                metric,
                claimed_value,
                matching_platforms,
            } => {
                assert_eq!(*metric, "roas");
                assert_eq!(*claimed_value, 5.9);
                assert_eq!(
                    matching_platforms,
                    &vec![PlatformMatch {
                        platform: "Meta".to_string(),
                        actual_value: 6.0,
                        match_type: MatchType::Max,
                    }]
                );
            }
            other => panic!("expected metric claim, got {other:?}"),
        }
    }

    #[test]
    fn mean_takes_precedence_over_max() {
        let verification = dataset().validate_claim("a roas of 4.2 across the board");
        match &verification.verifications[..] {
            [Verification::MetricClaim {
                matching_platforms, ..
            }] => {
                let matches: Vec<(&str, MatchType)> = matching_platforms
                    .iter()
                    .map(|found| (found.platform.as_str(), found.match_type))
                    .collect();
                assert_eq!(
                    matches,
                    vec![("Google", MatchType::Max), ("Meta", MatchType::Mean)]
                );
            }
            other => panic!("expected one metric claim, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_claim_is_not_verified() {
        let verification = dataset().validate_claim("Brand awareness is improving.");
        assert!(!verification.verified);
        assert!(verification.verifications.is_empty());
        let value = serde_json::to_value(&verification).expect("serializes");
        assert_eq!(value["verified"], false);
        assert_eq!(value["summary"]["by_platform"]["Google"]["count"], 2);
    }

    #[test]
    fn rejects_missing_platform_column() {
        let result = CampaignDataset::from_reader("campaign,roas\nBrand,2.0\n".as_bytes());
        assert!(matches!(result, Err(DatasetError::MissingPlatformColumn)));
    }

    #[test]
    fn rejects_header_only_input() {
        let result = CampaignDataset::from_reader("channel,roas\n".as_bytes());
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn falls_back_through_platform_aliases() {
        let data = CampaignDataset::from_reader("Source,CPC\nemail,0.4\n".as_bytes())
            .expect("parses");
        assert_eq!(data.platform_column(), "Source");
        assert!(data.has_metric("cpc"));
    }
}
