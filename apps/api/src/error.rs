//! # API Error Types
//!
//! Maps storage and domain errors to HTTP responses.
//!
//! ## Status Mapping
//! ```text
//! DbError::Domain (validation, insufficient stock, …)  → 400 Bad Request
//! DbError::UniqueViolation / ForeignKeyViolation       → 400 Bad Request
//! DbError::NotFound                                    → 404 Not Found
//! anything else                                        → 500, generic body
//! ```
//!
//! Every error body has the same shape the frontend expects:
//! `{"error": "<message>"}`. Internal errors are logged with their detail
//! but never leak it to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use stockpos_db::DbError;

/// Errors surfaced by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal server error")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(domain) => ApiError::BadRequest(domain.to_string()),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stockpos_core::CoreError;

    #[test]
    fn test_domain_errors_are_client_errors() {
        let err = ApiError::from(DbError::Domain(CoreError::EmptySale));
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = ApiError::from(DbError::duplicate("sku", "COKE-330"));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(DbError::not_found("Product", "abc"));
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err = ApiError::from(DbError::QueryFailed("secret table name".to_string()));
        assert_eq!(err.to_string(), "internal server error");
    }
}
