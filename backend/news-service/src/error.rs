//! Error types for News Service
//!
//! Every error is rendered to API clients as a JSON body with a single
//! `detail` member, mirroring the contract of the public news endpoints.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use mongodb::error::{ErrorKind, RETRYABLE_WRITE_ERROR, TRANSIENT_TRANSACTION_ERROR};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type for news-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// One entry of a validation failure, locating the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Path to the offending value, e.g. `["body", "title"]`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body is malformed or misses required fields
    #[error("Validation error: {}", join_messages(.0))]
    Validation(Vec<FieldError>),

    /// Request body is larger than the JSON extractor accepts
    #[error("Request body exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    /// No news item with the given identifier
    #[error("news {0} not found")]
    NotFound(String),

    /// The document store rejected the operation
    #[error("Store error: {0}")]
    Store(String),

    /// The document store could not be reached; retrying later may succeed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store operation exceeded the request deadline
    #[error("Store operation '{0}' timed out")]
    Timeout(&'static str),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn validation(field: &str, msg: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(&["body", field], msg, "value_error")])
    }

    /// Whether the failure is expected to clear up on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_) | AppError::Timeout(_))
    }
}

/// Error body returned for every non-validation failure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Error body returned for validation failures
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub detail: Vec<FieldError>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(transient = self.is_transient(), "request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "request rejected: {}", self);
        }

        match self {
            AppError::Validation(errors) => {
                HttpResponse::build(status).json(ValidationErrorResponse {
                    detail: errors.clone(),
                })
            }
            _ => HttpResponse::build(status).json(ErrorResponse {
                detail: self.to_string(),
            }),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        let transient = err.contains_label(RETRYABLE_WRITE_ERROR)
            || err.contains_label(TRANSIENT_TRANSACTION_ERROR)
            || matches!(
                err.kind.as_ref(),
                ErrorKind::ServerSelection { .. }
                    | ErrorKind::Io(_)
                    | ErrorKind::ConnectionPoolCleared { .. }
            );

        if transient {
            AppError::StoreUnavailable(err.to_string())
        } else {
            AppError::Store(err.to_string())
        }
    }
}
