//! User detail and delete pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use tower_sessions::Session;
use tracing::instrument;

use roster_core::User;

use super::flash::{self, Flash};
use super::{PageError, parse_id};
use crate::filters;
use crate::state::AppState;

/// Timestamp format shown in the dashboard.
const TIMESTAMP_FORMAT: &str = "%b %-d, %Y %H:%M UTC";

fn timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// User detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/show.html")]
pub struct UserShowTemplate {
    pub user: User,
    pub created_at: String,
    pub updated_at: String,
    pub flash: Option<Flash>,
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "users/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub user: User,
}

/// Display a single user.
///
/// GET /users/{id}
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<UserShowTemplate, PageError> {
    let id = parse_id(&id)?;
    let user = state.store().get(id).await?.ok_or(PageError::NotFound)?;

    Ok(UserShowTemplate {
        created_at: timestamp(user.created_at),
        updated_at: timestamp(user.updated_at),
        user,
        flash: flash::take(&session).await,
    })
}

/// Ask before deleting.
///
/// GET /users/{id}/delete
#[instrument(skip(state))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ConfirmDeleteTemplate, PageError> {
    let id = parse_id(&id)?;
    let user = state.store().get(id).await?.ok_or(PageError::NotFound)?;
    Ok(ConfirmDeleteTemplate { user })
}

/// Delete a user and return to the list.
///
/// POST /users/{id}/delete
#[instrument(skip(state, session))]
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect, PageError> {
    let id = parse_id(&id)?;
    if !state.store().delete(id).await? {
        return Err(PageError::NotFound);
    }

    tracing::info!(user_id = %id, "User deleted from dashboard");
    flash::push(&session, Flash::success("User deleted successfully")).await;
    Ok(Redirect::to("/users"))
}
