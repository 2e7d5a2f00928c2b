use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error taxonomy, surfaced to callers as JSON.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error("not enough active questions: found {found}, required {required}")]
    InsufficientQuestions { found: usize, required: usize },

    #[error("question pool exhausted at slot {slot}")]
    PoolExhausted { slot: usize },

    #[error("caller identity is missing or invalid")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::InsufficientQuestions { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_QUESTIONS")
            }
            AppError::PoolExhausted { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "POOL_EXHAUSTED")
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = json!({
            "error": self.to_string(),
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

/// Adapters from data-layer results into `AppError`, logging the cause.
pub trait ResultExt<T> {
    /// Map an error to `AppError::Internal` with the given message.
    fn reject(self, msg: &'static str) -> Result<T, AppError>;

    /// Map an error to `AppError::Validation` with the given message.
    fn reject_input(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{msg}: {e}");
            AppError::Internal(msg)
        })
    }

    fn reject_input(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{msg}: {e}");
            AppError::Validation(msg.to_string())
        })
    }
}
