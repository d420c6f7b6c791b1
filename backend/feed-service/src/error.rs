/// Error types for the feed service.
///
/// Every error carries enough context for the HTTP layer; responses are the
/// uniform `{"error", "status"}` JSON shape, with a `details` array for
/// field-level validation failures. Store errors are logged server-side and
/// never leak their message to clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Result type for feed-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// A single failed field in a request body or query string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Request failed validation; one entry per offending field.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Resource lookup missed. Malformed ids surface here too, so a caller
    /// cannot distinguish a bad id from an absent row.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Caller is authenticated but does not own the resource.
    #[error("User not authorized")]
    NotAuthorized,

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotAuthorized | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Validation(fields) => HttpResponse::build(status).json(serde_json::json!({
                "error": "Validation failed",
                "status": status.as_u16(),
                "details": fields,
            })),
            AppError::Database(e) => {
                error!(error = %e, "database failure");
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Internal server error",
                    "status": status.as_u16(),
                }))
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "internal failure");
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Internal server error",
                    "status": status.as_u16(),
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_resource() {
        let err = AppError::NotFound("Post");
        assert_eq!(err.to_string(), "Post not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ownership_violation_is_401() {
        assert_eq!(AppError::NotAuthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotAuthorized.to_string(), "User not authorized");
    }

    #[test]
    fn database_errors_do_not_leak() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_carries_field_details() {
        let err = AppError::invalid_field("content", "must be 1-280 characters");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields[0].field, "content");
            }
            _ => panic!("expected validation error"),
        }
    }
}
