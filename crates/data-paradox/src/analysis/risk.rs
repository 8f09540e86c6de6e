use super::challenges::ClaimResponse;
use super::matcher::Confidence;
use serde::{Deserialize, Serialize};
use std::fmt;

const HIGH_WEIGHT: u32 = 10;
const MEDIUM_WEIGHT: u32 = 5;
const LOW_WEIGHT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Level for a response that found challenges. `Minimal` is reserved for no-issue
    /// responses, so a zero total here is still `Low`.
    pub const fn from_total(total: u32) -> Self {
        if total >= 20 {
            Self::Critical
        } else if total >= 12 {
            Self::High
        } else if total >= 6 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "MINIMAL",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted aggregate of the confidence tiers in one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    pub total: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub level: RiskLevel,
}

impl RiskScore {
    pub const fn minimal() -> Self {
        Self {
            total: 0,
            high: 0,
            medium: 0,
            low: 0,
            level: RiskLevel::Minimal,
        }
    }

    pub fn from_response(response: &ClaimResponse) -> Self {
        if response.is_no_issues() {
            return Self::minimal();
        }
        Self::from_confidences(response.challenges().iter().map(|section| section.confidence))
    }

    /// Tiers outside HIGH/MEDIUM/LOW are ignored.
    pub fn from_confidences<I>(confidences: I) -> Self
    where
        I: IntoIterator<Item = Confidence>,
    {
        let (mut high, mut medium, mut low) = (0, 0, 0);
        for confidence in confidences {
            match confidence {
                Confidence::High => high += 1,
                Confidence::Medium => medium += 1,
                Confidence::Low => low += 1,
                Confidence::None => {}
            }
        }

        let total = high * HIGH_WEIGHT + medium * MEDIUM_WEIGHT + low * LOW_WEIGHT;
        Self {
            total,
            high,
            medium,
            low,
            level: RiskLevel::from_total(total),
        }
    }
}

pub fn score(response: &ClaimResponse) -> RiskScore {
    RiskScore::from_response(response)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    ClaimA,
    ClaimB,
    Both,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub winner: Winner,
    pub message: String,
    pub reasoning: String,
}

/// Picks the lower-risk claim and justifies it with the most specific reason available.
pub fn recommend(risk_a: &RiskScore, risk_b: &RiskScore) -> Recommendation {
    if risk_a.total == 0 && risk_b.total == 0 {
        return Recommendation {
            winner: Winner::Both,
            message: "Both claims show solid methodology with minimal logical risks.".to_string(),
            reasoning:
                "Either approach appears analytically sound based on the information provided."
                    .to_string(),
        };
    }

    if risk_a.total == risk_b.total {
        return Recommendation {
            winner: Winner::Tie,
            message: format!("Both claims have similar risk levels ({}).", risk_a.level),
            reasoning: "Consider other factors like implementation complexity, resource \
                        requirements, or strategic alignment."
                .to_string(),
        };
    }

    let (winner, winner_label, loser_label, winner_risk, loser_risk) = if risk_a.total < risk_b.total
    {
        (Winner::ClaimA, "Claim A", "Claim B", risk_a, risk_b)
    } else {
        (Winner::ClaimB, "Claim B", "Claim A", risk_b, risk_a)
    };

    let mut reasons = Vec::new();
    if winner_risk.high < loser_risk.high {
        reasons.push(format!(
            "{winner_label} has fewer HIGH-confidence risks ({} vs {})",
            winner_risk.high, loser_risk.high
        ));
    }
    if matches!(winner_risk.level, RiskLevel::Minimal | RiskLevel::Low)
        && matches!(loser_risk.level, RiskLevel::High | RiskLevel::Critical)
    {
        reasons.push(format!(
            "{winner_label} has {} risk while {loser_label} has {} risk",
            winner_risk.level, loser_risk.level
        ));
    }
    if reasons.is_empty() {
        reasons.push(format!(
            "{winner_label} has a lower overall risk score ({} vs {})",
            winner_risk.total, loser_risk.total
        ));
    }

    Recommendation {
        winner,
        message: format!("{winner_label} appears to be the lower-risk option."),
        reasoning: format!("{}.", reasons.join(". ")),
    }
}

/// One side of a claim comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAssessment {
    pub text: String,
    pub analysis: ClaimResponse,
    pub risk_score: RiskScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub claim_a: ClaimAssessment,
    pub claim_b: ClaimAssessment,
    pub recommendation: Recommendation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_verification: Option<serde_json::Value>,
}
