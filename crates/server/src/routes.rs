//! Application router assembly.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health            - Liveness
//! GET  /health/ready      - Readiness (store ping)
//! /api/*                  - JSON API
//! /, /users/*             - Dashboard
//! /static/*               - Stylesheets
//! ```
//!
//! Anything else, including a known path with an unsupported method, is a
//! 404 envelope.

use std::path::{Path, PathBuf};

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;

use crate::api;
use crate::dashboard;
use crate::error::AppError;
use crate::middleware::{cors_layer, create_session_layer, request_id_middleware, trace_layer};
use crate::state::AppState;

/// Static assets shipped with the server crate.
fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

/// Build the full application with middleware applied.
///
/// Sentry layers are added by the caller so tests can exercise the router
/// without a Sentry hub.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().cors_origin.as_deref());

    Router::new()
        .route("/health", get(api::health::health))
        .route("/health/ready", get(api::health::readiness))
        .nest("/api", api::routes())
        .merge(dashboard::routes())
        .nest_service("/static", ServeDir::new(static_dir()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .layer(create_session_layer())
        .layer(from_fn(request_id_middleware))
        .layer(trace_layer())
        .layer(cors)
        .with_state(state)
}
