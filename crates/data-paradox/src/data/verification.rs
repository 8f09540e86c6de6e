use super::stats::{DatasetSummary, PlatformStats};
use super::METRIC_ALIASES;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A claimed value counts as confirmed when it is strictly closer than this to the actual figure.
const MATCH_TOLERANCE: f64 = 0.5;

struct MetricPatterns {
    metric: &'static str,
    patterns: [Regex; 2],
}

fn metric_patterns() -> &'static [MetricPatterns] {
    static PATTERNS: OnceLock<Vec<MetricPatterns>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        METRIC_ALIASES
            .iter()
            .map(|&(metric, _)| MetricPatterns {
                metric,
                patterns: [
                    Regex::new(&format!(r"{metric}\s*(?:is|:|=)\s*(\d+\.?\d*)"))
                        .expect("metric claim pattern compiles"),
                    Regex::new(&format!(r"{metric}\s*(?:of|at)\s*(\d+\.?\d*)"))
                        .expect("metric claim pattern compiles"),
                ],
            })
            .collect()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Mean,
    Max,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformMatch {
    pub platform: String,
    pub actual_value: f64,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Verification {
    PlatformDetected {
        platform: String,
        stats: PlatformStats,
    },
    MetricClaim {
        metric: &'static str,
        claimed_value: f64,
        matching_platforms: Vec<PlatformMatch>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataVerification {
    pub verified: bool,
    pub verifications: Vec<Verification>,
    pub summary: DatasetSummary,
}

pub(crate) fn verify_claim(
    claim: &str,
    summary: &DatasetSummary,
    detected_metrics: &[&'static str],
) -> DataVerification {
    let lowered = claim.to_lowercase();
    let mut verifications = Vec::new();

    for (platform, stats) in &summary.by_platform {
        if lowered.contains(&platform.to_lowercase()) {
            verifications.push(Verification::PlatformDetected {
                platform: platform.clone(),
                stats: stats.clone(),
            });
        }
    }

    for entry in metric_patterns()
        .iter()
        .filter(|entry| detected_metrics.contains(&entry.metric))
    {
        for pattern in &entry.patterns {
            let Some(claimed_value) = pattern
                .captures(&lowered)
                .and_then(|captures| captures.get(1))
                .and_then(|value| value.as_str().parse::<f64>().ok())
            else {
                continue;
            };

            verifications.push(Verification::MetricClaim {
                metric: entry.metric,
                claimed_value,
                matching_platforms: matching_platforms(summary, entry.metric, claimed_value),
            });
        }
    }

    DataVerification {
        verified: !verifications.is_empty(),
        verifications,
        summary: summary.clone(),
    }
}

/// Mean is checked before max; a platform is listed at most once.
fn matching_platforms(
    summary: &DatasetSummary,
    metric: &str,
    claimed_value: f64,
) -> Vec<PlatformMatch> {
    summary
        .by_platform
        .iter()
        .filter_map(|(platform, stats)| {
            let actual = stats.metrics.get(metric)?;
            let (actual_value, match_type) = if (claimed_value - actual.mean).abs() < MATCH_TOLERANCE
            {
                (actual.mean, MatchType::Mean)
            } else if (claimed_value - actual.max).abs() < MATCH_TOLERANCE {
                (actual.max, MatchType::Max)
            } else {
                return None;
            };
            Some(PlatformMatch {
                platform: platform.clone(),
                actual_value,
                match_type,
            })
        })
        .collect()
}
