use super::matcher::{Confidence, FallacyMatch};
use serde::{Deserialize, Serialize};

pub const NO_ISSUES_MESSAGE: &str =
    "No obvious fallacies detected. However, always validate with data!";

const MAX_CONSTRUCTIVE: usize = 3;
const MAX_DIRECT: usize = 3;
const MAX_ALTERNATIVES: usize = 2;

/// User-facing view of one matched fallacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSection {
    pub fallacy_id: String,
    pub fallacy_name: String,
    pub confidence: Confidence,
    pub description: String,
    pub constructive_questions: Vec<String>,
    pub direct_challenges: Vec<String>,
    pub missing_data: Vec<String>,
    pub alternative_explanations: Vec<String>,
}

impl ChallengeSection {
    pub fn from_match(found: &FallacyMatch) -> Self {
        let challenges = &found.challenges;
        Self {
            fallacy_id: found.fallacy_id.clone(),
            fallacy_name: found.fallacy_name.clone(),
            confidence: found.confidence,
            description: found.description.clone(),
            constructive_questions: capped(&challenges.constructive, MAX_CONSTRUCTIVE),
            direct_challenges: capped(&challenges.direct, MAX_DIRECT),
            missing_data: challenges.missing_data.clone(),
            alternative_explanations: capped(&challenges.alternatives, MAX_ALTERNATIVES),
        }
    }
}

fn capped(items: &[String], limit: usize) -> Vec<String> {
    items.iter().take(limit).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    NoIssues {
        message: String,
    },
    ChallengesFound {
        claim: String,
        /// Count before truncation.
        fallacies_detected: usize,
        challenges: Vec<ChallengeSection>,
    },
}

/// Analysis result for one claim, optionally carrying an attached data verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResponse {
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_verification: Option<serde_json::Value>,
}

impl ClaimResponse {
    pub fn no_issues() -> Self {
        Self {
            outcome: AnalysisOutcome::NoIssues {
                message: NO_ISSUES_MESSAGE.to_string(),
            },
            data_verification: None,
        }
    }

    pub fn is_no_issues(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::NoIssues { .. })
    }

    pub fn challenges(&self) -> &[ChallengeSection] {
        match &self.outcome {
            AnalysisOutcome::NoIssues { .. } => &[],
            AnalysisOutcome::ChallengesFound { challenges, .. } => challenges,
        }
    }

    pub fn fallacies_detected(&self) -> usize {
        match &self.outcome {
            AnalysisOutcome::NoIssues { .. } => 0,
            AnalysisOutcome::ChallengesFound {
                fallacies_detected, ..
            } => *fallacies_detected,
        }
    }

    pub fn with_data_verification(mut self, verification: serde_json::Value) -> Self {
        self.data_verification = Some(verification);
        self
    }
}

/// Keeps the first `max_fallacies` matches, which arrive sorted by the matcher.
pub fn build_response(claim: &str, matches: &[FallacyMatch], max_fallacies: usize) -> ClaimResponse {
    if matches.is_empty() {
        return ClaimResponse::no_issues();
    }

    let challenges = matches
        .iter()
        .take(max_fallacies)
        .map(ChallengeSection::from_match)
        .collect();

    ClaimResponse {
        outcome: AnalysisOutcome::ChallengesFound {
            claim: claim.to_string(),
            fallacies_detected: matches.len(),
            challenges,
        },
        data_verification: None,
    }
}
