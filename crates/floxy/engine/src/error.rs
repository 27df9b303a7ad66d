//! Error types for the workflow engine and its HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Engine and store errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record exists but is in a state that forbids the operation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller supplied an unusable argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Actor resolution failure
#[derive(Debug, Error)]
#[error("Unable to resolve actor: {0}")]
pub struct AuthError(pub String);

/// API-facing errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(msg) => ApiError::NotFound(msg),
            EngineError::Conflict(msg) => ApiError::Conflict(msg),
            EngineError::InvalidInput(msg) => ApiError::BadRequest(msg),
            EngineError::Database(e) => {
                tracing::error!(error = %e, "Database error while serving request");
                ApiError::Internal("database error".to_string())
            }
        }
    }
}

/// Error response body
///
/// The UI reads `message` when showing a failed action.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let message = self.to_string();
        let body = ErrorResponse {
            error: message.clone(),
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("instance 7".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("already completed".to_string())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AuthError("no session".to_string()))
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_engine_error_mapping() {
        assert!(matches!(
            ApiError::from(EngineError::InvalidInput("decision".to_string())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(EngineError::Database(sqlx::Error::PoolClosed)),
            ApiError::Internal(_)
        ));
    }
}
