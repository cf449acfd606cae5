use axum::http::{header, HeaderValue, Method};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use loan_risk::assessment::RiskAssessor;
use loan_risk::config::{AppConfig, CorsOrigins};
use loan_risk::error::AppError;

use crate::history::PredictionHistory;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared by the prediction routes. The assessor is stateless; the history is the only
/// cross-request state and belongs to this service, not to the engine.
#[derive(Clone)]
pub(crate) struct PredictionState {
    pub(crate) assessor: Arc<RiskAssessor>,
    pub(crate) history: Arc<PredictionHistory>,
}

impl PredictionState {
    pub(crate) fn new(assessor: RiskAssessor, history_limit: usize) -> Self {
        Self {
            assessor: Arc::new(assessor),
            history: Arc::new(PredictionHistory::new(history_limit)),
        }
    }
}

pub(crate) fn build_assessor(config: &AppConfig) -> Result<RiskAssessor, AppError> {
    let policy = config.assessment.risk_policy()?;
    Ok(RiskAssessor::new(policy)?)
}

/// Lets a browser front end on another origin call the JSON API.
pub(crate) fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::from(Any),
        CorsOrigins::List(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
