use super::catalog::{ChallengeSet, FallacyCatalog, FallacyRule, ANY_METRIC};
use super::features::ClaimFeatures;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

const KEYWORD_POINTS: u32 = 3;
const METRIC_POINTS: u32 = 5;
const PATTERN_POINTS: u32 = 2;
const REALLOCATION_BONUS: u32 = 3;

const EXPERIMENT_DISCOUNT: u32 = 5;
const STATISTICAL_TEST_DISCOUNT: u32 = 3;
const LARGE_SAMPLE_DISCOUNT: u32 = 2;

const EXPERIMENT_TERMS: &[&str] = &[
    "a/b test",
    "controlled test",
    "randomized",
    "control group",
    "experiment",
    "holdout",
    "split test",
    "50/50",
    "50-50",
];

const STATISTICAL_TERMS: &[&str] = &[
    "p-value",
    "p value",
    "statistical significance",
    "confidence interval",
    "statistically significant",
    "t-test",
    "chi-square",
    "regression",
];

fn large_sample_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"\d+,?\d+\s+(users|conversions|samples|participants|respondents)|sample size.*\d+,?\d+|\d+k\+?\s+(users|conversions)",
        )
        .expect("large sample pattern compiles")
    })
}

/// Coarse bucket derived from a match score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const fn from_score(score: u32) -> Self {
        if score >= 15 {
            Self::High
        } else if score >= 8 {
            Self::Medium
        } else if score >= 3 {
            Self::Low
        } else {
            Self::None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Evidence of rigorous method found in the claim text itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MethodologySignals {
    pub controlled_experiment: bool,
    pub statistical_test: bool,
    pub large_sample: bool,
}

impl MethodologySignals {
    pub fn discount_points(&self) -> u32 {
        self.steps().into_iter().sum()
    }

    /// Subtracts each discount in turn, flooring at zero after every step.
    pub fn apply(&self, raw_score: u32) -> u32 {
        self.steps()
            .into_iter()
            .fold(raw_score, |score, step| score.saturating_sub(step))
    }

    fn steps(&self) -> [u32; 3] {
        [
            if self.controlled_experiment { EXPERIMENT_DISCOUNT } else { 0 },
            if self.statistical_test { STATISTICAL_TEST_DISCOUNT } else { 0 },
            if self.large_sample { LARGE_SAMPLE_DISCOUNT } else { 0 },
        ]
    }
}

/// Scans the raw claim once; the result applies to every rule alike.
pub fn extract_discount_signals(text: &str) -> MethodologySignals {
    let lowered = text.to_lowercase();
    MethodologySignals {
        controlled_experiment: EXPERIMENT_TERMS.iter().any(|term| lowered.contains(term)),
        statistical_test: STATISTICAL_TERMS.iter().any(|term| lowered.contains(term)),
        large_sample: large_sample_pattern().is_match(&lowered),
    }
}

/// Undiscounted score of one rule against one claim.
pub fn score_rule(features: &ClaimFeatures, rule: &FallacyRule) -> u32 {
    let triggers = &rule.triggers;

    let rule_keywords: HashSet<String> = triggers
        .keywords
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .collect();
    let keyword_hits = rule_keywords
        .iter()
        .filter(|keyword| features.keywords.contains(keyword.as_str()))
        .count() as u32;

    let rule_metrics: Vec<String> = triggers
        .metrics
        .iter()
        .map(|metric| metric.to_lowercase())
        .collect();
    let wildcard = rule_metrics.iter().any(|metric| metric == ANY_METRIC);
    let metric_hits = features
        .metrics_found
        .iter()
        .filter(|metric| wildcard || rule_metrics.contains(&metric.to_lowercase()))
        .count() as u32;

    let lowered = features.original.to_lowercase();
    let pattern_hits = triggers
        .patterns
        .iter()
        .filter(|pattern| lowered.contains(&pattern.to_lowercase()))
        .count() as u32;

    let bonus = if features.has_recommendation
        && triggers.keywords.iter().any(|keyword| keyword == "reallocate")
    {
        REALLOCATION_BONUS
    } else {
        0
    };

    keyword_hits * KEYWORD_POINTS
        + metric_hits * METRIC_POINTS
        + pattern_hits * PATTERN_POINTS
        + bonus
}

/// A rule that scored above zero for a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallacyMatch {
    pub fallacy_id: String,
    pub fallacy_name: String,
    pub description: String,
    pub match_score: u32,
    pub confidence: Confidence,
    pub challenges: ChallengeSet,
}

/// Scores every catalog rule against a claim.
#[derive(Debug, Clone)]
pub struct FallacyMatcher {
    catalog: Arc<FallacyCatalog>,
}

impl FallacyMatcher {
    pub fn new(catalog: Arc<FallacyCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FallacyCatalog {
        &self.catalog
    }

    /// Matches ordered by descending score; equal scores keep catalog order.
    pub fn detect(&self, claim: &str) -> Vec<FallacyMatch> {
        let features = ClaimFeatures::extract(claim);
        let signals = extract_discount_signals(claim);
        self.detect_features(&features, signals)
    }

    pub fn detect_features(
        &self,
        features: &ClaimFeatures,
        signals: MethodologySignals,
    ) -> Vec<FallacyMatch> {
        let mut matches: Vec<FallacyMatch> = self
            .catalog
            .iter()
            .filter_map(|rule| {
                let match_score = signals.apply(score_rule(features, rule));
                (match_score > 0).then(|| FallacyMatch {
                    fallacy_id: rule.id.clone(),
                    fallacy_name: rule.name.clone(),
                    description: rule.description.clone(),
                    match_score,
                    confidence: Confidence::from_score(match_score),
                    challenges: rule.challenges.clone(),
                })
            })
            .collect();

        matches.sort_by(|left, right| right.match_score.cmp(&left.match_score));
        matches
    }
}
