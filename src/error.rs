//! Error handling module
//!
//! `SyncError` is the taxonomy of the cascade core. `AppError` wraps it for
//! the HTTP layer and renders the JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Fatal errors raised while resolving or cascading a schema event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A source descriptor or object graph is malformed
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The live catalog has no table under the requested key
    #[error("Table not found in live catalog: {database}.{table}")]
    NotFound { database: String, table: String },

    /// A child qualified name could not be computed
    #[error("Naming error for child '{child}' of '{parent}': {reason}")]
    Naming {
        parent: String,
        child: String,
        reason: String,
    },
}

impl SyncError {
    pub fn conversion(msg: impl Into<String>) -> Self {
        SyncError::Conversion(msg.into())
    }

    pub fn not_found(database: impl Into<String>, table: impl Into<String>) -> Self {
        SyncError::NotFound {
            database: database.into(),
            table: table.into(),
        }
    }

    pub fn naming(
        parent: impl Into<String>,
        child: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SyncError::Naming {
            parent: parent.into(),
            child: child.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for the cascade core
pub type SyncResult<T> = Result<T, SyncError>;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            AppError::Sync(SyncError::Conversion(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONVERSION_ERROR",
                "Schema object could not be converted".to_string(),
                Some(msg.clone()),
            ),
            AppError::Sync(e @ SyncError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                "TABLE_NOT_FOUND",
                e.to_string(),
                None,
            ),
            AppError::Sync(e @ SyncError::Naming { .. }) => {
                error!("Naming error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "NAMING_ERROR",
                    "Renamed qualified name could not be computed".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = self.parts();

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}
