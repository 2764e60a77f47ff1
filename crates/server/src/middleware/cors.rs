//! CORS policy.

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS, or a single allowed origin when one is configured.
///
/// An origin that is not a valid header value falls back to permissive.
#[must_use]
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Ignoring invalid ROSTER_CORS_ORIGIN");
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}
