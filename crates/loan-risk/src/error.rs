use crate::assessment::{PolicyError, ValidationError};
use crate::batch::BatchImportError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Policy(PolicyError),
    Validation(ValidationError),
    Batch(BatchImportError),
    Io(std::io::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Policy(_)
            | AppError::Batch(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Policy(err) => write!(f, "policy error: {}", err),
            AppError::Validation(err) => write!(f, "{}", err),
            AppError::Batch(err) => write!(f, "batch error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Policy(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Batch(err) => Some(err),
            AppError::Io(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(err) => Json(json!({
                "error": self.to_string(),
                "field": err.field().as_str(),
            })),
            _ => Json(json!({ "error": self.to_string() })),
        };
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<PolicyError> for AppError {
    fn from(value: PolicyError) -> Self {
        Self::Policy(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BatchImportError> for AppError {
    fn from(value: BatchImportError) -> Self {
        Self::Batch(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Field;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let error = AppError::from(ValidationError::Missing {
            field: Field::MonthlyIncome,
        });
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn policy_errors_map_to_internal_error() {
        let error = AppError::from(PolicyError::ZeroTenure);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
