//! Application Error Types
//!
//! Layered error handling: adapters raise [`StoreError`] / [`IndexError`],
//! entity services raise [`ServiceError`], and the HTTP layer converts
//! everything into [`AppError`] with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::UnknownSortProperty;

/// Durable store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Unsupported sort property: {0}")]
    InvalidSort(String),

    #[error("Write attempted in a read-only unit of work")]
    ReadOnly,
}

/// Search index failure.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Search document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot index {0} without an id")]
    MissingId(&'static str),

    #[error("Unsupported sort property: {0}")]
    InvalidSort(String),
}

impl From<UnknownSortProperty> for StoreError {
    fn from(err: UnknownSortProperty) -> Self {
        StoreError::InvalidSort(err.0)
    }
}

impl From<UnknownSortProperty> for IndexError {
    fn from(err: UnknownSortProperty) -> Self {
        IndexError::InvalidSort(err.0)
    }
}

/// Entity service error.
///
/// Store and index failures are carried through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0} id is required")]
    MissingId(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// `fields` is empty when the failure is not tied to request fields.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Search index error: {0}")]
    Index(IndexError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ServiceError::MissingId(_) => AppError::BadRequest(err.to_string()),
            ServiceError::Validation(message) => AppError::Validation {
                message,
                fields: Vec::new(),
            },
            ServiceError::Store(StoreError::Conflict(msg)) => AppError::Conflict(msg),
            ServiceError::Store(StoreError::InvalidSort(prop))
            | ServiceError::Index(IndexError::InvalidSort(prop)) => {
                AppError::BadRequest(format!("Unsupported sort property: {}", prop))
            }
            ServiceError::Store(e) => AppError::Store(e),
            ServiceError::Index(e) => AppError::Index(e),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, u16) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, 10001),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, 10002),
            AppError::Conflict(_) => (StatusCode::CONFLICT, 10005),
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, 10007),
            AppError::Internal(_) | AppError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, 10000)
            }
            AppError::Index(_) => (StatusCode::SERVICE_UNAVAILABLE, 10008),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let (message, errors) = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                (msg, None)
            }
            AppError::Validation { message, fields } => {
                (message, Some(fields).filter(|f| !f.is_empty()))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".into(), None)
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                ("Internal server error".into(), None)
            }
            AppError::Index(e) => {
                tracing::error!("Search index error: {}", e);
                ("Search index unavailable".into(), None)
            }
        };

        let body = ErrorResponse {
            code,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
