use super::challenges::{AnalysisOutcome, ClaimResponse};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// Plain-text rendering of a response for terminals and logs.
pub fn render_text(response: &ClaimResponse) -> String {
    let (claim, fallacies_detected, challenges) = match &response.outcome {
        AnalysisOutcome::NoIssues { message } => return format!("\n[OK] {message}\n"),
        AnalysisOutcome::ChallengesFound {
            claim,
            fallacies_detected,
            challenges,
        } => (claim, fallacies_detected, challenges),
    };

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "DATA PARADOX - CHALLENGE REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "\nYour Claim:\n{claim}\n");
    let _ = writeln!(out, "Potential Issues Found: {fallacies_detected}");
    let _ = writeln!(out, "Showing Top {} Challenge(s)\n", challenges.len());

    for (index, section) in challenges.iter().enumerate() {
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "\nCHALLENGE #{}: {}", index + 1, section.fallacy_name);
        let _ = writeln!(out, "Confidence: {}", section.confidence);
        let _ = writeln!(out, "\nWhat This Means:");
        let _ = writeln!(out, "   {}\n", section.description);

        write_list(&mut out, "CONSTRUCTIVE QUESTIONS:", &section.constructive_questions);
        write_list(&mut out, "\nDIRECT CHALLENGES:", &section.direct_challenges);
        write_list(&mut out, "\nMISSING DATA YOU SHOULD CHECK:", &section.missing_data);
        write_list(
            &mut out,
            "\nALTERNATIVE EXPLANATIONS:",
            &section.alternative_explanations,
        );
        out.push('\n');
    }

    if let Some(verification) = &response.data_verification {
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "DATA VERIFICATION:");
        let _ = writeln!(out, "   {verification}\n");
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "How to Strengthen Your Analysis:");
    let _ = writeln!(out, "   1. Address the missing data points identified above");
    let _ = writeln!(out, "   2. Run controlled experiments to test causality");
    let _ = writeln!(out, "   3. Consider alternative explanations before finalizing");
    let _ = writeln!(out, "{rule}");

    out
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(out, "{heading}");
    for item in items {
        let _ = writeln!(out, "   - {item}");
    }
}
