//! Unified error handling with Sentry integration.
//!
//! Every failure leaves the server as the JSON envelope
//! `{"success": false, "message": ..., "errors": [...]}`. Server errors are
//! captured to Sentry before responding; their details never reach clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use roster_core::FieldError;

use crate::db::RepositoryError;

/// Which part of the request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    Body,
    Params,
    Query,
}

impl ValidationScope {
    /// Envelope message for this scope.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Body => "Validation failed",
            Self::Params => "Invalid request params",
            Self::Query => "Invalid query params",
        }
    }
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body is not parseable JSON.
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    /// Body, path or query failed schema validation.
    #[error("{}", .scope.message())]
    Validation {
        scope: ValidationScope,
        errors: Vec<FieldError>,
    },

    /// Unique constraint violation.
    #[error("Conflict on {field}: {message}")]
    Conflict { field: String, message: String },

    /// User does not exist.
    #[error("User not found")]
    NotFound,

    /// No route matched the request.
    #[error("Route not found")]
    RouteNotFound,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure in the given scope.
    #[must_use]
    pub const fn validation(scope: ValidationScope, errors: Vec<FieldError>) -> Self {
        Self::Validation { scope, errors }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the client-facing envelope.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        let (message, errors) = match self {
            Self::InvalidJson(detail) => (
                "Invalid JSON payload".to_string(),
                vec![FieldError::root(detail.clone())],
            ),
            Self::Validation { scope, errors } => (scope.message().to_string(), errors.clone()),
            Self::Conflict { field, message } => {
                let summary = if field == "email" {
                    "Email already exists"
                } else {
                    "Unique constraint violation"
                };
                (summary.to_string(), vec![FieldError::new(field, message)])
            }
            Self::NotFound | Self::RouteNotFound => (self.to_string(), Vec::new()),
            // Don't expose internal error details to clients
            Self::Database(_) | Self::Internal(_) => {
                ("Internal server error".to_string(), Vec::new())
            }
        };

        ErrorEnvelope {
            success: false,
            message,
            errors,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { field, message } => Self::Conflict { field, message },
            other => Self::Database(other),
        }
    }
}

/// Serialized failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), Json(self.envelope())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
