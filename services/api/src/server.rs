use crate::cli::ServeArgs;
use crate::infra::{AnalysisService, AppState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use data_paradox::config::AppConfig;
use data_paradox::error::AppError;
use data_paradox::telemetry;
use data_paradox::ClaimAnalyzer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let analyzer = Arc::new(ClaimAnalyzer::load(&config.analysis)?);
    info!(
        rules = analyzer.catalog().len(),
        source = ?config.analysis.catalog_path,
        max_fallacies = analyzer.default_max_fallacies(),
        "fallacy catalog loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(AnalysisService::new(analyzer, config.data.upload_enabled));
    let app = router(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        upload_enabled = config.data.upload_enabled,
        "data paradox service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
