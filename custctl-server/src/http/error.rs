//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Store failures are logged in full and returned with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;
use crate::service::ServiceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Store unreachable or refusing connections (503)
    StoreUnavailable(DbError),

    /// Store statement exceeded its bound (504)
    StoreTimeout(DbError),

    /// Insert rejected by the store (500)
    StoreWrite(DbError),

    /// Select rejected by the store (500)
    StoreRead(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::StoreTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::StoreWrite(_) | Self::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind for the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::StoreTimeout(_) => "store_timeout",
            Self::StoreWrite(_) => "store_write_error",
            Self::StoreRead(_) => "store_read_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(e) => e.to_string(),
            Self::StoreUnavailable(e) => {
                tracing::error!(error = %e, "store unavailable");
                "the record store is unavailable".to_owned()
            }
            Self::StoreTimeout(e) => {
                tracing::error!(error = %e, "store timeout");
                "the record store did not respond in time".to_owned()
            }
            Self::StoreWrite(e) => {
                tracing::error!(error = %e, "store write failed");
                "the record could not be stored".to_owned()
            }
            Self::StoreRead(e) => {
                tracing::error!(error = %e, "store read failed");
                "the records could not be read".to_owned()
            }
        };

        let body = json!({
            "error": self.kind(),
            "message": message
        });

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
            DbError::Unavailable(_) => Self::StoreUnavailable(e),
            DbError::Timeout(_) => Self::StoreTimeout(e),
            DbError::Write(_) => Self::StoreWrite(e),
            DbError::Read(_) => Self::StoreRead(e),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => v.into(),
            ServiceError::Store(db) => db.into(),
        }
    }
}
