//! `/api/users` handlers.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use roster_core::{CreateUserRequest, PageMeta, PatchUserRequest, ReplaceUserRequest, User};

use super::{DataResponse, ListQuery, MessageResponse, Payload, UserIdParam};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List users, optionally searched, sorted and paged.
///
/// `meta` is only present when `page` or `limit` was supplied.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery,
) -> Result<DataResponse<Vec<User>>> {
    let page = state.store().list(&query).await?;

    let meta = query.paging.zip(page.total).map(|(paging, total)| PageMeta {
        total,
        page: paging.page,
        limit: paging.limit,
    });

    Ok(DataResponse::new(page.users).with_meta(meta))
}

/// Fetch a single user.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    UserIdParam(id): UserIdParam,
) -> Result<DataResponse<User>> {
    let user = state.store().get(id).await?.ok_or(AppError::NotFound)?;
    Ok(DataResponse::new(user))
}

/// Create a user. Responds 201 with the stored record.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Payload(request): Payload<CreateUserRequest>,
) -> Result<(StatusCode, DataResponse<User>)> {
    let user = state.store().create(request.into_inner()).await?;
    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, DataResponse::new(user)))
}

/// Replace every writable field of a user.
#[instrument(skip(state, request))]
pub async fn replace(
    State(state): State<AppState>,
    UserIdParam(id): UserIdParam,
    Payload(request): Payload<ReplaceUserRequest>,
) -> Result<DataResponse<User>> {
    let user = state
        .store()
        .replace(id, request.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(DataResponse::new(user))
}

/// Apply a partial update to a user.
#[instrument(skip(state, request))]
pub async fn patch(
    State(state): State<AppState>,
    UserIdParam(id): UserIdParam,
    Payload(request): Payload<PatchUserRequest>,
) -> Result<DataResponse<User>> {
    let user = state
        .store()
        .patch(id, request.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(DataResponse::new(user))
}

/// Delete a user.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    UserIdParam(id): UserIdParam,
) -> Result<MessageResponse> {
    if !state.store().delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(user_id = %id, "User deleted");
    Ok(MessageResponse::new("User deleted"))
}
