use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Question generation failed: {0}")]
    Generation(String),

    #[error("Session is not active")]
    SessionNotActive,

    #[error("Session has been finalized")]
    SessionFinalized,

    #[error("Session is not yet completed")]
    SessionNotCompleted,

    #[error("Submission does not match the current question")]
    StaleSubmission,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, code, error_message) = match self {
            Error::Validation(err) => {
                let fields: Vec<String> =
                    err.field_errors().keys().map(|k| k.to_string()).collect();
                let body = Json(json!({
                    "error": "validation_failed",
                    "message": err.to_string(),
                    "fields": fields,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Error::Generation(msg) => (StatusCode::BAD_GATEWAY, "generation_failed", msg),
            Error::SessionNotActive => (
                StatusCode::CONFLICT,
                "session_not_active",
                "Session is not active".to_string(),
            ),
            Error::SessionFinalized => (
                StatusCode::CONFLICT,
                "session_finalized",
                "Session has already been completed".to_string(),
            ),
            Error::SessionNotCompleted => (
                StatusCode::CONFLICT,
                "session_not_completed",
                "Session has not been completed yet".to_string(),
            ),
            Error::StaleSubmission => (
                StatusCode::CONFLICT,
                "stale_submission",
                "Submission does not match the current question".to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "bad_json", err.to_string()),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                format!("External service error: {}", err),
            ),
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            Error::Anyhow(err) => (StatusCode::BAD_GATEWAY, "upstream_error", err.to_string()),
        };

        let body = Json(json!({ "error": code, "message": error_message }));
        (status, body).into_response()
    }
}
