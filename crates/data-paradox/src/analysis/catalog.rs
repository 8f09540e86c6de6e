use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Catalog shipped with the crate; `PARADOX_CATALOG_PATH` may replace it at startup.
const BUILTIN_CATALOG: &str = include_str!("../../catalog/fallacies.json");

/// Metric trigger that matches every metric a claim mentions.
pub const ANY_METRIC: &str = "any metric";

/// Errors raised while loading a fallacy catalog. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read fallacy catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fallacy catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fallacy catalog defines no rules")]
    Empty,
    #[error("fallacy catalog defines `{0}` more than once")]
    DuplicateRule(String),
}

/// Conditions under which a rule contributes to a claim's score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpec {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Canned challenge text attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSet {
    pub constructive: Vec<String>,
    pub direct: Vec<String>,
    pub missing_data: Vec<String>,
    pub alternatives: Vec<String>,
}

/// One catalog entry. The id comes from the entry's key in the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallacyRule {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub triggers: TriggerSpec,
    pub challenges: ChallengeSet,
}

/// Read-only rule set, iterated in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallacyCatalog {
    rules: Vec<FallacyRule>,
}

impl FallacyCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Loads the catalog at `path`, or the built-in one when no path is configured.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let OrderedRules(entries) = serde_json::from_reader(reader)?;
        Self::from_entries(entries)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let OrderedRules(entries) = serde_json::from_str(raw)?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<(String, FallacyRule)>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(entries.len());
        for (id, mut rule) in entries {
            if !seen.insert(id.clone()) {
                return Err(CatalogError::DuplicateRule(id));
            }
            rule.id = id;
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FallacyRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FallacyRule> {
        self.rules.iter()
    }
}

/// Map entries in document order, duplicates included, so the catalog can reject them.
struct OrderedRules(Vec<(String, FallacyRule)>);

impl<'de> Deserialize<'de> for OrderedRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedRulesVisitor;

        impl<'de> Visitor<'de> for OrderedRulesVisitor {
            type Value = OrderedRules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of fallacy id to rule definition")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, rule)) = map.next_entry::<String, FallacyRule>()? {
                    entries.push((id, rule));
                }
                Ok(OrderedRules(entries))
            }
        }

        deserializer.deserialize_map(OrderedRulesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_json(name: &str) -> String {
        format!(
            r#"{{"name":"{name}","description":"d","triggers":{{"keywords":["x"]}},
            "challenges":{{"constructive":[],"direct":[],"missing_data":[],"alternatives":[]}}}}"#
        )
    }

    #[test]
    fn builtin_catalog_loads_in_document_order() {
        let catalog = FallacyCatalog::builtin().expect("builtin catalog parses");
        let ids: Vec<&str> = catalog.iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "hasty_generalization",
                "survivorship_bias",
                "correlation_causation",
                "simpsons_paradox",
                "attribution_bias",
                "regression_to_mean",
                "linear_extrapolation",
                "cherry_picking",
            ]
        );
        let hasty = catalog.get("hasty_generalization").expect("rule present");
        assert!(hasty.triggers.keywords.iter().any(|k| k == "reallocate"));
        assert!(hasty.triggers.metrics.iter().any(|m| m == ANY_METRIC));
    }

    #[test]
    fn preserves_order_that_differs_from_alphabetical() {
        let raw = format!(r#"{{"zeta":{},"alpha":{}}}"#, rule_json("Z"), rule_json("A"));
        let catalog = FallacyCatalog::from_json_str(&raw).expect("parses");
        let ids: Vec<&str> = catalog.iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
        assert!(catalog.get("alpha").expect("alpha").triggers.metrics.is_empty());
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            FallacyCatalog::from_json_str("{}"),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = format!(r#"{{"dup":{},"dup":{}}}"#, rule_json("A"), rule_json("B"));
        match FallacyCatalog::from_json_str(&raw) {
            Err(CatalogError::DuplicateRule(id)) => assert_eq!(id, "dup"),
            other => panic!("expected duplicate rule error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_entries_missing_challenges() {
        let raw = r#"{"broken":{"name":"n","description":"d"}}"#;
        assert!(matches!(
            FallacyCatalog::from_json_str(raw),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FallacyCatalog::from_path("/nonexistent/fallacies.json")
            .expect_err("missing file fails");
        assert!(err.to_string().contains("/nonexistent/fallacies.json"));
    }
}
