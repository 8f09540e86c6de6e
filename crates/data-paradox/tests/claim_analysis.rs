use data_paradox::analysis::{AnalysisOutcome, COMPARE_MAX_FALLACIES};
use data_paradox::{
    render_text, ClaimAnalyzer, Confidence, FallacyCatalog, RiskLevel, RiskScore, Winner,
};
use std::sync::Arc;
use std::thread;

const REALLOCATION: &str = "Since campaigns with a ROAS above 4.0 represent our most efficient \
spend, we should immediately reallocate 30% of the budget from underperforming Brand campaigns \
(ROAS < 2.0) to these high-performers to maximize total profit.";

const CTR_TO_CPA: &str = "Our analysis shows that campaigns with a Click-Through Rate (CTR) above \
5% consistently yield a 20% lower Cost Per Acquisition (CPA), suggesting that creative \
optimization is the primary lever for solving the Google Tax problem.";

const PLATFORM_PARITY: &str = "Across the 1,800 campaigns, we found that YouTube and Display ads \
have a significantly higher ROAS than Search ads when using a 30-day view-through attribution \
window. Therefore, we should transition the majority of the Search budget to Video to avoid the \
high competition tax on Search.";

const RIGOROUS: &str =
    "We ran a randomized holdout experiment with 120,000 users and a p-value below 0.01.";

fn analyzer() -> ClaimAnalyzer {
    let catalog = FallacyCatalog::builtin().expect("builtin catalog loads");
    ClaimAnalyzer::new(Arc::new(catalog))
}

fn ranked(analyzer: &ClaimAnalyzer, claim: &str) -> Vec<(String, u32, Confidence)> {
    analyzer
        .detect(claim)
        .into_iter()
        .map(|found| (found.fallacy_id, found.match_score, found.confidence))
        .collect()
}

#[test]
fn reallocation_claim_flags_overfitting_to_top_performers() {
    let analyzer = analyzer();
    let detected = ranked(&analyzer, REALLOCATION);

    let ids: Vec<&str> = detected.iter().map(|(id, _, _)| id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "hasty_generalization",
            "linear_extrapolation",
            "regression_to_mean",
            "survivorship_bias",
            "simpsons_paradox",
            "attribution_bias",
            "cherry_picking",
        ]
    );
    assert_eq!(
        detected[0],
        ("hasty_generalization".to_string(), 26, Confidence::High)
    );
    assert_eq!(detected[2].1, 10);
    assert_eq!(detected[2].2, Confidence::Medium);
}

#[test]
fn methodology_language_lowers_every_match() {
    let analyzer = analyzer();
    let baseline = ranked(&analyzer, REALLOCATION);
    let rigorous = ranked(
        &analyzer,
        &format!("{REALLOCATION} Validated with a randomized control group, 50,000 users."),
    );

    for (id, score, _) in &baseline {
        match rigorous.iter().find(|(other, _, _)| other == id) {
            Some((_, discounted, _)) => assert!(
                discounted + 5 <= *score,
                "{id}: {discounted} not at least 5 below {score}"
            ),
            None => assert!(*score <= 7, "{id} dropped despite scoring {score}"),
        }
    }
    assert_eq!(
        rigorous,
        vec![
            ("hasty_generalization".to_string(), 19, Confidence::High),
            ("linear_extrapolation".to_string(), 11, Confidence::Medium),
            ("regression_to_mean".to_string(), 3, Confidence::Low),
        ]
    );
}

#[test]
fn analyze_truncates_to_highest_scoring_sections() {
    let analyzer = analyzer();
    let response = analyzer.analyze(CTR_TO_CPA, 2);

    assert_eq!(response.fallacies_detected(), 7);
    let ids: Vec<&str> = response
        .challenges()
        .iter()
        .map(|section| section.fallacy_id.as_str())
        .collect();
    assert_eq!(ids, vec!["correlation_causation", "hasty_generalization"]);

    let everything = analyzer.analyze(CTR_TO_CPA, 50);
    assert_eq!(everything.challenges().len(), 7);
    // Equal scores keep catalog order.
    let tied: Vec<&str> = everything.challenges()[2..4]
        .iter()
        .map(|section| section.fallacy_id.as_str())
        .collect();
    assert_eq!(tied, vec!["regression_to_mean", "cherry_picking"]);
}

#[test]
fn sections_carry_capped_catalog_text() {
    let response = analyzer().analyze(REALLOCATION, 3);
    let hasty = &response.challenges()[0];

    assert_eq!(
        hasty.fallacy_name,
        "Hasty Generalization (Overfitting to Top Performers)"
    );
    assert_eq!(hasty.constructive_questions.len(), 3);
    assert_eq!(hasty.direct_challenges.len(), 3);
    assert_eq!(hasty.missing_data.len(), 4);
    assert_eq!(hasty.alternative_explanations.len(), 2);
}

#[test]
fn rigorous_claim_has_no_issues_and_minimal_risk() {
    let analyzer = analyzer();
    let response = analyzer.analyze(RIGOROUS, 3);

    assert!(analyzer.detect(RIGOROUS).is_empty());
    assert!(matches!(response.outcome, AnalysisOutcome::NoIssues { .. }));
    assert_eq!(data_paradox::analysis::score(&response), RiskScore::minimal());
    assert!(render_text(&response).contains("No obvious fallacies detected"));
}

#[test]
fn analyze_is_idempotent() {
    let analyzer = analyzer();
    assert_eq!(
        analyzer.analyze(PLATFORM_PARITY, 3),
        analyzer.analyze(PLATFORM_PARITY, 3)
    );
}

#[test]
fn compare_prefers_claim_with_fewer_high_risks() {
    let comparison = analyzer().compare(REALLOCATION, CTR_TO_CPA);

    assert_eq!(comparison.claim_a.risk_score.total, 25);
    assert_eq!(comparison.claim_a.risk_score.level, RiskLevel::Critical);
    assert_eq!(comparison.claim_b.risk_score.total, 30);
    assert_eq!(comparison.claim_b.risk_score.high, 3);
    assert_eq!(comparison.recommendation.winner, Winner::ClaimA);
    assert_eq!(
        comparison.recommendation.reasoning,
        "Claim A has fewer HIGH-confidence risks (2 vs 3)."
    );
    assert!(comparison.claim_a.analysis.challenges().len() <= COMPARE_MAX_FALLACIES);
}

#[test]
fn compare_is_symmetric_under_swap() {
    let analyzer = analyzer();
    let forward = analyzer.compare(REALLOCATION, RIGOROUS);
    let backward = analyzer.compare(RIGOROUS, REALLOCATION);

    assert_eq!(forward.recommendation.winner, Winner::ClaimB);
    assert_eq!(backward.recommendation.winner, Winner::ClaimA);
    assert_eq!(forward.claim_a.risk_score, backward.claim_b.risk_score);
    assert_eq!(forward.claim_b.risk_score, backward.claim_a.risk_score);
    assert_eq!(
        forward.recommendation.reasoning,
        "Claim B has fewer HIGH-confidence risks (0 vs 2). \
         Claim B has MINIMAL risk while Claim A has CRITICAL risk."
    );
}

#[test]
fn identical_claims_tie_with_equal_risk() {
    let comparison = analyzer().compare(PLATFORM_PARITY, PLATFORM_PARITY);

    assert_eq!(comparison.recommendation.winner, Winner::Tie);
    assert_eq!(comparison.claim_a.risk_score, comparison.claim_b.risk_score);
    assert_eq!(
        comparison.recommendation.message,
        "Both claims have similar risk levels (CRITICAL)."
    );
}

#[test]
fn two_sound_claims_are_both_acceptable() {
    let comparison = analyzer().compare(RIGOROUS, "The weather was nice on Tuesday.");
    assert_eq!(comparison.recommendation.winner, Winner::Both);
    assert_eq!(comparison.claim_b.risk_score.level, RiskLevel::Minimal);
}

#[test]
fn comparison_serializes_with_snake_case_winner() {
    let comparison = analyzer().compare(CTR_TO_CPA, PLATFORM_PARITY);
    let value = serde_json::to_value(&comparison).expect("comparison serializes");

    assert_eq!(value["recommendation"]["winner"], "tie");
    assert_eq!(value["claim_a"]["text"], CTR_TO_CPA);
    assert_eq!(value["claim_a"]["analysis"]["status"], "challenges_found");
    assert_eq!(value["claim_b"]["risk_score"]["level"], "CRITICAL");
    assert!(value.get("data_verification").is_none());
}

#[test]
fn shared_analyzer_is_safe_across_threads() {
    let analyzer = Arc::new(analyzer());
    let expected = analyzer.analyze(REALLOCATION, 3);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || analyzer.analyze(REALLOCATION, 3))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("analysis thread completes"), expected);
    }
}
