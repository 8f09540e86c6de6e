use crate::infra::{AnalysisService, AppState, UploadSummary};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use data_paradox::analysis::Comparison;
use data_paradox::data::PlatformMean;
use data_paradox::error::AppError;
use data_paradox::ClaimResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    #[serde(default)]
    pub(crate) claim: String,
    #[serde(default)]
    pub(crate) max_fallacies: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompareRequest {
    #[serde(default)]
    pub(crate) claim_a: String,
    #[serde(default)]
    pub(crate) claim_b: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PlatformComparisonResponse {
    pub(crate) metric: String,
    pub(crate) platforms: Vec<PlatformMean>,
}

pub(crate) fn router(service: Arc<AnalysisService>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/analyze", post(analyze_endpoint))
        .route("/api/compare", post(compare_endpoint))
        .route(
            "/api/upload",
            post(upload_endpoint).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/dataset", get(dataset_endpoint))
        .route("/api/platforms/:metric", get(platforms_endpoint))
        .with_state(service)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn analyze_endpoint(
    State(service): State<Arc<AnalysisService>>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<ClaimResponse>, AppError> {
    if payload.claim.trim().is_empty() {
        warn!("analyze request rejected: empty claim");
        return Err(AppError::invalid_request("No claim provided"));
    }
    if payload.max_fallacies == Some(0) {
        warn!("analyze request rejected: max_fallacies is zero");
        return Err(AppError::invalid_request(
            "max_fallacies must be a positive integer",
        ));
    }

    Ok(Json(service.analyze(&payload.claim, payload.max_fallacies)))
}

pub(crate) async fn compare_endpoint(
    State(service): State<Arc<AnalysisService>>,
    Json(payload): Json<CompareRequest>,
) -> Result<Json<Comparison>, AppError> {
    if payload.claim_a.trim().is_empty() || payload.claim_b.trim().is_empty() {
        warn!("compare request rejected: missing claim");
        return Err(AppError::invalid_request("Both claims required"));
    }

    Ok(Json(service.compare(&payload.claim_a, &payload.claim_b)))
}

pub(crate) async fn upload_endpoint(
    State(service): State<Arc<AnalysisService>>,
    body: Bytes,
) -> Result<Json<UploadSummary>, AppError> {
    if body.is_empty() {
        warn!("upload rejected: empty body");
        return Err(AppError::invalid_request("No file provided"));
    }

    service.load_csv(&body).map(Json).map_err(|err| {
        warn!(error = %err, "upload rejected");
        err
    })
}

pub(crate) async fn dataset_endpoint(
    State(service): State<Arc<AnalysisService>>,
) -> Json<serde_json::Value> {
    let payload = match service.loaded_dataset() {
        Some(loaded) => json!({
            "loaded": true,
            "rows": loaded.dataset.rows(),
            "columns": loaded.dataset.columns(),
            "platform_column": loaded.dataset.platform_column(),
            "metric_columns": loaded.dataset.metric_columns(),
            "loaded_at": loaded.loaded_at,
        }),
        None => json!({ "loaded": false }),
    };
    Json(payload)
}

pub(crate) async fn platforms_endpoint(
    State(service): State<Arc<AnalysisService>>,
    Path(metric): Path<String>,
) -> Result<Json<PlatformComparisonResponse>, AppError> {
    let platforms = service.platform_comparison(&metric)?;
    Ok(Json(PlatformComparisonResponse {
        metric: metric.to_lowercase(),
        platforms,
    }))
}
