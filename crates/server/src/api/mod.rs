//! JSON API mounted under `/api`.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health        - Liveness
//! GET    /api/users         - List (search, sort, page, limit)
//! POST   /api/users         - Create
//! GET    /api/users/{id}    - Fetch one
//! PUT    /api/users/{id}    - Full replace
//! PATCH  /api/users/{id}    - Partial update
//! DELETE /api/users/{id}    - Delete
//! ```

pub mod extract;
pub mod health;
pub mod response;
pub mod users;

use axum::{Router, routing::get};

use crate::state::AppState;

pub use extract::{ListQuery, Payload, UserIdParam};
pub use response::{DataResponse, MessageResponse};

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::show)
                .put(users::replace)
                .patch(users::patch)
                .delete(users::delete),
        )
}
