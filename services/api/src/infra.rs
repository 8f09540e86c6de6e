use chrono::{DateTime, Utc};
use data_paradox::analysis::Comparison;
use data_paradox::data::{DatasetSummary, PlatformMean};
use data_paradox::error::AppError;
use data_paradox::{CampaignDataset, ClaimAnalyzer, ClaimResponse};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Campaign data uploaded at runtime together with its load time.
#[derive(Debug, Clone)]
pub(crate) struct LoadedDataset {
    pub(crate) dataset: CampaignDataset,
    pub(crate) loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UploadSummary {
    pub(crate) success: bool,
    pub(crate) rows: usize,
    pub(crate) columns: Vec<String>,
    pub(crate) summary: DatasetSummary,
    pub(crate) loaded_at: DateTime<Utc>,
}

/// Request-facing wrapper around the shared analyzer and the optional uploaded dataset.
pub(crate) struct AnalysisService {
    analyzer: Arc<ClaimAnalyzer>,
    upload_enabled: bool,
    dataset: RwLock<Option<LoadedDataset>>,
}

impl AnalysisService {
    pub(crate) fn new(analyzer: Arc<ClaimAnalyzer>, upload_enabled: bool) -> Self {
        Self {
            analyzer,
            upload_enabled,
            dataset: RwLock::new(None),
        }
    }

    pub(crate) fn analyzer(&self) -> &ClaimAnalyzer {
        &self.analyzer
    }

    pub(crate) fn analyze(&self, claim: &str, max_fallacies: Option<usize>) -> ClaimResponse {
        let max_fallacies = max_fallacies.unwrap_or_else(|| self.analyzer.default_max_fallacies());
        let response = self.analyzer.analyze(claim, max_fallacies);
        match self.verify(claim) {
            Some(verification) => response.with_data_verification(verification),
            None => response,
        }
    }

    pub(crate) fn compare(&self, claim_a: &str, claim_b: &str) -> Comparison {
        let mut comparison = self.analyzer.compare(claim_a, claim_b);
        if let (Some(a), Some(b)) = (self.verify(claim_a), self.verify(claim_b)) {
            comparison.data_verification = Some(json!({ "claim_a": a, "claim_b": b }));
        }
        comparison
    }

    /// Replaces any previously loaded dataset.
    pub(crate) fn load_csv(&self, body: &[u8]) -> Result<UploadSummary, AppError> {
        if !self.upload_enabled {
            return Err(AppError::UploadDisabled);
        }

        let dataset = CampaignDataset::from_reader(body)?;
        let loaded_at = Utc::now();
        let summary = UploadSummary {
            success: true,
            rows: dataset.rows(),
            columns: dataset.columns().to_vec(),
            summary: dataset.summary().clone(),
            loaded_at,
        };

        info!(
            rows = summary.rows,
            platforms = summary.summary.by_platform.len(),
            "campaign dataset loaded"
        );
        *self.dataset.write().expect("dataset lock poisoned") =
            Some(LoadedDataset { dataset, loaded_at });
        Ok(summary)
    }

    pub(crate) fn platform_comparison(&self, metric: &str) -> Result<Vec<PlatformMean>, AppError> {
        let guard = self.dataset.read().expect("dataset lock poisoned");
        let loaded = guard
            .as_ref()
            .ok_or_else(|| AppError::invalid_request("No data loaded. Upload CSV first."))?;
        Ok(loaded.dataset.platform_comparison(metric))
    }

    pub(crate) fn loaded_dataset(&self) -> Option<LoadedDataset> {
        self.dataset.read().expect("dataset lock poisoned").clone()
    }

    /// Absent when no dataset is loaded; analysis output is unaffected either way.
    fn verify(&self, claim: &str) -> Option<serde_json::Value> {
        let guard = self.dataset.read().expect("dataset lock poisoned");
        let loaded = guard.as_ref()?;
        match serde_json::to_value(loaded.dataset.validate_claim(claim)) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "dropping unserializable data verification");
                None
            }
        }
    }
}
