use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::application::errors::ServiceError;
use crate::application::forms::FormErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FormErrors),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => ApiError::Validation(fields),
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            other => ApiError::Status(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": "validation_failed", "fields": fields})),
            )
                .into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "unauthorized"})),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "not_found"})),
            )
                .into_response(),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "bad_request", "detail": msg})),
            )
                .into_response(),
            ApiError::Status(status) => (
                status,
                Json(serde_json::json!({
                    "error": status.canonical_reason().unwrap_or("error")
                })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request_failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "internal_error"})),
                )
                    .into_response()
            }
        }
    }
}
