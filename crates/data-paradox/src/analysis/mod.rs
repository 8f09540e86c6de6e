mod catalog;
mod challenges;
mod features;
mod matcher;
mod report;
mod risk;

pub use catalog::{CatalogError, ChallengeSet, FallacyCatalog, FallacyRule, TriggerSpec, ANY_METRIC};
pub use challenges::{
    build_response, AnalysisOutcome, ChallengeSection, ClaimResponse, NO_ISSUES_MESSAGE,
};
pub use features::ClaimFeatures;
pub use matcher::{
    extract_discount_signals, score_rule, Confidence, FallacyMatch, FallacyMatcher,
    MethodologySignals,
};
pub use report::render_text;
pub use risk::{
    recommend, score, ClaimAssessment, Comparison, Recommendation, RiskLevel, RiskScore, Winner,
};

use crate::config::AnalysisConfig;
use std::sync::Arc;
use tracing::debug;

/// Each side of a comparison is truncated to this many challenges before scoring.
pub const COMPARE_MAX_FALLACIES: usize = 3;

/// Entry point for claim analysis. Holds only the read-only catalog, so one instance can be
/// shared across threads and requests.
#[derive(Debug, Clone)]
pub struct ClaimAnalyzer {
    matcher: FallacyMatcher,
    default_max_fallacies: usize,
}

impl ClaimAnalyzer {
    pub fn new(catalog: Arc<FallacyCatalog>) -> Self {
        Self {
            matcher: FallacyMatcher::new(catalog),
            default_max_fallacies: AnalysisConfig::default().max_fallacies,
        }
    }

    /// Builds an analyzer from the configured catalog source. Failure here is fatal for callers.
    pub fn load(config: &AnalysisConfig) -> Result<Self, CatalogError> {
        let catalog = FallacyCatalog::load(config.catalog_path.as_deref())?;
        debug!(rules = catalog.len(), "fallacy catalog loaded");
        Ok(Self {
            matcher: FallacyMatcher::new(Arc::new(catalog)),
            default_max_fallacies: config.max_fallacies,
        })
    }

    pub fn catalog(&self) -> &FallacyCatalog {
        self.matcher.catalog()
    }

    pub fn default_max_fallacies(&self) -> usize {
        self.default_max_fallacies
    }

    pub fn detect(&self, claim: &str) -> Vec<FallacyMatch> {
        self.matcher.detect(claim)
    }

    /// Callers must reject empty claims before calling.
    pub fn analyze(&self, claim: &str, max_fallacies: usize) -> ClaimResponse {
        let matches = self.detect(claim);
        debug!(
            detected = matches.len(),
            max_fallacies,
            top = matches.first().map(|found| found.fallacy_id.as_str()),
            "claim analyzed"
        );
        build_response(claim, &matches, max_fallacies)
    }

    pub fn analyze_default(&self, claim: &str) -> ClaimResponse {
        self.analyze(claim, self.default_max_fallacies)
    }

    pub fn compare(&self, claim_a: &str, claim_b: &str) -> Comparison {
        let claim_a = self.assess(claim_a);
        let claim_b = self.assess(claim_b);
        let recommendation = recommend(&claim_a.risk_score, &claim_b.risk_score);
        debug!(
            risk_a = claim_a.risk_score.total,
            risk_b = claim_b.risk_score.total,
            winner = ?recommendation.winner,
            "claims compared"
        );

        Comparison {
            claim_a,
            claim_b,
            recommendation,
            data_verification: None,
        }
    }

    fn assess(&self, claim: &str) -> ClaimAssessment {
        let analysis = self.analyze(claim, COMPARE_MAX_FALLACIES);
        let risk_score = score(&analysis);
        ClaimAssessment {
            text: claim.to_string(),
            analysis,
            risk_score,
        }
    }
}
