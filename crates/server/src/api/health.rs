//! Health endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::MessageResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns OK if the server is running. Does not check dependencies.
pub async fn health() -> MessageResponse {
    MessageResponse::new("OK")
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store does not answer a ping.
pub async fn readiness(State(state): State<AppState>) -> Response {
    match state.store().ping().await {
        Ok(()) => MessageResponse::new("OK").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            let mut envelope = AppError::Internal(e.to_string()).envelope();
            envelope.message = "Service unavailable".to_string();
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(envelope)).into_response()
        }
    }
}
