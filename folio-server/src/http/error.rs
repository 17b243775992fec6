//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Missing or invalid session (401)
    Unauthorized,

    /// Login with unknown user or wrong password (401)
    InvalidCredentials,

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint violated (409)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    /// Not-found for a resource without an id (singletons).
    pub fn missing(resource: &'static str) -> Self {
        Self::NotFound {
            resource,
            id: String::new(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "unauthorized",
                    "message": "Unauthorized"
                }),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "invalid_credentials",
                    "message": "invalid username or password"
                }),
            ),
            Self::NotFound { resource, id } => {
                let message = if id.is_empty() {
                    format!("{} not found", resource)
                } else {
                    format!("{} '{}' not found", resource, id)
                };
                (
                    StatusCode::NOT_FOUND,
                    json!({
                        "error": "not_found",
                        "message": message
                    }),
                )
            }
            Self::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": message
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict(constraint) => Self::Conflict {
                message: format!("a record with the same value already exists ({})", constraint),
            },
            DbError::InvalidReference(constraint) => {
                Self::Validation(ValidationError::UnknownReference(constraint))
            }
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken(_) => Self::Unauthorized,
            AuthError::Database(db) => Self::from(db),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::internal(format!("IO error: {}", e))
    }
}
