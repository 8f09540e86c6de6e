use clap::Args;
use data_paradox::analysis::{ClaimAssessment, Comparison};
use data_paradox::config::AppConfig;
use data_paradox::error::AppError;
use data_paradox::{render_text, CampaignDataset, ClaimAnalyzer};
use std::path::PathBuf;

/// Budget-review claims replayed by `demo`.
const DEMO_CLAIMS: [(&str, &str); 3] = [
    (
        "High-ROAS Budget Reallocation",
        "Since campaigns with a ROAS above 4.0 represent our most efficient spend, we should \
         immediately reallocate 30% of the budget from underperforming Brand campaigns \
         (ROAS < 2.0) to these high-performers to maximize total profit.",
    ),
    (
        "CTR-to-Conversion Correlation",
        "Our analysis shows that campaigns with a Click-Through Rate (CTR) above 5% consistently \
         yield a 20% lower Cost Per Acquisition (CPA), suggesting that creative optimization is \
         the primary lever for solving the Google Tax problem.",
    ),
    (
        "Platform Parity Efficiency",
        "Across the 1,800 campaigns, we found that YouTube and Display ads have a significantly \
         higher ROAS than Search ads when using a 30-day view-through attribution window. \
         Therefore, we should transition the majority of the Search budget to Video to avoid \
         the high competition tax on Search.",
    ),
];

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Claim text to challenge
    pub(crate) claim: String,
    /// Maximum number of challenges to show (defaults to PARADOX_MAX_FALLACIES)
    #[arg(long, value_parser = parse_positive)]
    pub(crate) max_fallacies: Option<usize>,
    /// Print the response as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
    /// Campaign CSV export to verify the claim's figures against
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    /// First claim
    pub(crate) claim_a: String,
    /// Second claim
    pub(crate) claim_b: String,
    /// Print the comparison as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(format!("'{raw}' is not a positive integer")),
    }
}

fn load_analyzer() -> Result<ClaimAnalyzer, AppError> {
    let config = AppConfig::load()?;
    Ok(ClaimAnalyzer::load(&config.analysis)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        claim,
        max_fallacies,
        json,
        data,
    } = args;

    if claim.trim().is_empty() {
        return Err(AppError::invalid_request("No claim provided"));
    }

    let analyzer = load_analyzer()?;
    let max_fallacies = max_fallacies.unwrap_or_else(|| analyzer.default_max_fallacies());
    let mut response = analyzer.analyze(&claim, max_fallacies);

    if let Some(path) = data {
        let dataset = CampaignDataset::from_path(&path)?;
        let verification = serde_json::to_value(dataset.validate_claim(&claim))
            .map_err(std::io::Error::from)?;
        response = response.with_data_verification(verification);
    }

    if json {
        print_json(&response)
    } else {
        println!("{}", render_text(&response));
        Ok(())
    }
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    if args.claim_a.trim().is_empty() || args.claim_b.trim().is_empty() {
        return Err(AppError::invalid_request("Both claims required"));
    }

    let analyzer = load_analyzer()?;
    let comparison = analyzer.compare(&args.claim_a, &args.claim_b);

    if args.json {
        print_json(&comparison)
    } else {
        print!("{}", render_comparison(&comparison));
        Ok(())
    }
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let analyzer = load_analyzer()?;

    println!("Data Paradox demo");
    println!("Running {} pre-loaded claims", DEMO_CLAIMS.len());

    for (index, (name, claim)) in DEMO_CLAIMS.iter().enumerate() {
        println!("\n{}", "#".repeat(80));
        println!("TEST CASE {}: {}", index + 1, name);
        println!("{}", "#".repeat(80));

        let response = analyzer.analyze_default(claim);
        println!("{}", render_text(&response));
    }

    let comparison = analyzer.compare(DEMO_CLAIMS[0].1, DEMO_CLAIMS[1].1);
    println!("\nHead-to-head: {} vs {}", DEMO_CLAIMS[0].0, DEMO_CLAIMS[1].0);
    print!("{}", render_comparison(&comparison));
    Ok(())
}

fn render_comparison(comparison: &Comparison) -> String {
    let mut out = String::new();
    out.push_str(&render_assessment("Claim A", &comparison.claim_a));
    out.push_str(&render_assessment("Claim B", &comparison.claim_b));
    out.push_str(&format!(
        "Recommendation: {}\nReasoning: {}\n",
        comparison.recommendation.message, comparison.recommendation.reasoning
    ));
    out
}

fn render_assessment(label: &str, assessment: &ClaimAssessment) -> String {
    let risk = &assessment.risk_score;
    let mut out = format!(
        "{label}: {} risk (score {}; {} high / {} medium / {} low)\n",
        risk.level, risk.total, risk.high, risk.medium, risk.low
    );
    for section in assessment.analysis.challenges() {
        out.push_str(&format!(
            "  - {} [{}]\n",
            section.fallacy_name, section.confidence
        ));
    }
    out
}
