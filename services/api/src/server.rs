use crate::cli::ServeArgs;
use crate::infra::{build_assessor, cors_layer, AppState, PredictionState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_risk::config::AppConfig;
use loan_risk::error::AppError;
use loan_risk::telemetry;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let assessor = build_assessor(&config)?;
    info!(policy = ?assessor.policy(), "risk policy loaded");
    let prediction_state = PredictionState::new(assessor, config.assessment.history_limit);

    let app = with_service_routes(prediction_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(cors_layer(&config.server.cors_origins));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
