use crate::candidates::CandidateServiceError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("{}", .0.body_text())]
    Rejected(#[from] JsonRejection),
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    NotFound(CandidateServiceError),
    #[error(transparent)]
    Intake(#[from] CandidateServiceError),
}

/// Client mistakes surface verbatim; anything else is logged and hidden behind a fixed message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Intake(_)
            | AppError::Payload(_)
            | AppError::Rejected(_)
            | AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                error!(error = %self, "unexpected failure while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
