use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use tracing::info;

use loan_risk::assessment::ApplicationRequest;
use loan_risk::error::AppError;

use crate::history::HistoryView;
use crate::infra::{AppState, PredictionState};
use crate::views::PredictionView;

/// Prediction and history endpoints.
pub(crate) fn prediction_router(state: PredictionState) -> Router {
    Router::new()
        .route("/api/predict", post(predict_handler))
        .route("/api/history", get(history_handler))
        .with_state(state)
}

pub(crate) fn with_service_routes(state: PredictionState) -> Router {
    prediction_router(state)
        .route("/api/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn predict_handler(
    State(state): State<PredictionState>,
    payload: Result<Json<ApplicationRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let body = Json(json!({ "error": rejection.body_text() }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }
    };

    match state.assessor.assess(&request) {
        Ok(result) => {
            let view = PredictionView::from(&result);
            state.history.record(&view);
            info!(
                eligible = view.eligible,
                risk_category = %view.risk_category,
                "prediction served"
            );
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn history_handler(State(state): State<PredictionState>) -> Json<HistoryView> {
    Json(state.history.snapshot())
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
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
