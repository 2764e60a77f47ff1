//! Server-rendered dashboard for browsing and editing users.
//!
//! Mounted at the site root; the JSON API lives under `/api`. Notifications
//! survive the post-redirect-get cycle as a [`flash::Flash`] in the session.

pub mod detail;
pub mod edit;
pub mod flash;
pub mod form;
pub mod list;
pub mod pagination;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use thiserror::Error;

use roster_core::UserId;

use crate::db::RepositoryError;
use crate::state::AppState;

/// Build the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/users") }))
        .route("/users", get(list::index))
        .route("/users/new", get(edit::new).post(edit::create))
        .route("/users/{id}", get(detail::show))
        .route("/users/{id}/edit", get(edit::edit).post(edit::update))
        .route(
            "/users/{id}/delete",
            get(detail::confirm_delete).post(detail::destroy),
        )
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: &'static str,
    pub message: &'static str,
}

/// Failures that end a dashboard request with an error page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("User not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(RepositoryError),
}

impl From<RepositoryError> for PageError {
    fn from(err: RepositoryError) -> Self {
        Self::Store(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorTemplate {
                    title: "User not found",
                    message: "The user you are looking for does not exist or was deleted.",
                },
            )
                .into_response(),
            Self::Store(ref err) => {
                let event_id = sentry::capture_error(err);
                tracing::error!(
                    error = %err,
                    sentry_event_id = %event_id,
                    "Dashboard request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorTemplate {
                        title: "Something went wrong",
                        message: "Please try again in a moment.",
                    },
                )
                    .into_response()
            }
        }
    }
}

/// Parse the `{id}` segment; anything that is not a user id is a missing page.
fn parse_id(raw: &str) -> Result<UserId, PageError> {
    raw.parse().map_err(|_| PageError::NotFound)
}
