use serde::Serialize;
use std::collections::BTreeSet;

/// Marketing metrics recognised by case-insensitive substring match.
pub const KNOWN_METRICS: &[&str] = &[
    "ROAS",
    "ROI",
    "CPA",
    "CTR",
    "CPC",
    "CPM",
    "conversion rate",
    "click-through rate",
    "cost per acquisition",
    "return on ad spend",
    "cost per click",
    "engagement rate",
    "bounce rate",
    "CAC",
];

/// Words that signal a recommendation or planned action.
pub const ACTION_WORDS: &[&str] = &[
    "should",
    "reallocate",
    "shift",
    "move",
    "increase",
    "decrease",
    "optimize",
    "scale",
    "reduce",
    "allocate",
    "invest",
    "cut",
    "transition",
    "switch",
    "change",
    "adjust",
];

pub const COMPARISON_WORDS: &[&str] = &[
    "better",
    "worse",
    "higher",
    "lower",
    "more",
    "less",
    "superior",
    "inferior",
    "outperform",
    "underperform",
    "vs",
    "versus",
    "compared to",
    "than",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been",
];

/// Normalized signals extracted from one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimFeatures {
    pub original: String,
    /// Vocabulary spelling of each metric mentioned, in vocabulary order.
    pub metrics_found: Vec<&'static str>,
    pub action_words_found: Vec<&'static str>,
    pub comparison_words_found: Vec<&'static str>,
    pub has_recommendation: bool,
    pub has_comparison: bool,
    pub keywords: BTreeSet<String>,
}

impl ClaimFeatures {
    /// Callers must pass non-empty text; blank claims are rejected at the boundary.
    pub fn extract(text: &str) -> Self {
        let lowered = text.to_lowercase();

        let metrics_found = KNOWN_METRICS
            .iter()
            .copied()
            .filter(|metric| lowered.contains(&metric.to_lowercase()))
            .collect();

        // The found-word lists respect word boundaries while the flags below are plain
        // substring scans ("shoulder" raises has_recommendation but is not listed).
        let action_words_found = words_present(&lowered, ACTION_WORDS);
        let comparison_words_found = words_present(&lowered, COMPARISON_WORDS);
        let has_recommendation = ACTION_WORDS.iter().any(|word| lowered.contains(word));
        let has_comparison = COMPARISON_WORDS.iter().any(|word| lowered.contains(word));

        Self {
            original: text.to_string(),
            metrics_found,
            action_words_found,
            comparison_words_found,
            has_recommendation,
            has_comparison,
            keywords: keywords(&lowered),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn words_present(lowered: &str, vocabulary: &[&'static str]) -> Vec<&'static str> {
    vocabulary
        .iter()
        .copied()
        .filter(|word| contains_word(lowered, word))
        .collect()
}

/// Whole-word search. Every vocabulary entry starts and ends with a word character, so a
/// boundary holds when the neighbouring characters are not word characters.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn keywords(lowered: &str) -> BTreeSet<String> {
    lowered
        .split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().count() > 2 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUDGET_CLAIM: &str = "Since campaigns with a ROAS above 4.0 represent our most \
        efficient spend, we should immediately reallocate 30% of the budget from \
        underperforming Brand campaigns (ROAS < 2.0) to these high-performers to maximize \
        total profit.";

    #[test]
    fn extracts_metrics_case_insensitively_without_duplicates() {
        let features = ClaimFeatures::extract(BUDGET_CLAIM);
        assert_eq!(features.metrics_found, vec!["ROAS"]);

        let features = ClaimFeatures::extract(
            "A higher Click-Through Rate (CTR) gives a lower cost per acquisition and CPA.",
        );
        assert_eq!(
            features.metrics_found,
            vec!["CPA", "CTR", "click-through rate", "cost per acquisition"]
        );
    }

    #[test]
    fn found_words_respect_word_boundaries() {
        let features =
            ClaimFeatures::extract("We should move spend because Search is worse than Video.");
        assert_eq!(features.action_words_found, vec!["should", "move"]);
        assert_eq!(features.comparison_words_found, vec!["worse", "than"]);
        assert!(features.has_recommendation);
        assert!(features.has_comparison);
    }

    #[test]
    fn flags_use_substring_scan_unlike_found_lists() {
        let features = ClaimFeatures::extract("Their shoulders moved with the cutting wind.");
        assert!(features.action_words_found.is_empty());
        assert!(features.has_recommendation, "'should' and 'move' appear as substrings");

        let features = ClaimFeatures::extract("Nevertheless, it holds.");
        assert!(features.comparison_words_found.is_empty());
        assert!(features.has_comparison, "'less' is a substring of 'nevertheless'");
    }

    #[test]
    fn multi_word_comparisons_match_as_phrases() {
        let features = ClaimFeatures::extract("Display compared to Search looks fine.");
        assert_eq!(features.comparison_words_found, vec!["compared to"]);
    }

    #[test]
    fn keywords_drop_stop_words_and_short_tokens() {
        let features = ClaimFeatures::extract(BUDGET_CLAIM);
        for expected in ["reallocate", "immediately", "performers", "high", "roas", "our"] {
            assert!(features.keywords.contains(expected), "missing {expected}");
        }
        for dropped in ["the", "to", "30", "of", "with", "from", "we"] {
            assert!(!features.keywords.contains(dropped), "unexpected {dropped}");
        }
        assert!(features.keywords.iter().all(|token| token == &token.to_lowercase()));
    }

    #[test]
    fn extraction_is_deterministic() {
        assert_eq!(
            ClaimFeatures::extract(BUDGET_CLAIM),
            ClaimFeatures::extract(BUDGET_CLAIM)
        );
    }
}
