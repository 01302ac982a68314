use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::flights::provider::ProviderError;

/// Every failure surfaced by a handler. Each variant maps to one HTTP
/// status and a `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    #[error("{0}")]
    InvalidRange(String),

    #[error("Flight provider request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    DatabaseUnhealthy(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::DuplicateUsername => (StatusCode::CONFLICT, self.to_string()),
            ApiError::InvalidCredentials | ApiError::InvalidCurrentPassword => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidRange(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Provider(e) => {
                error!(error = %e, "provider call failed");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            ApiError::DatabaseUnhealthy(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
