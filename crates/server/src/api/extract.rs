//! Request extractors that validate at the boundary.
//!
//! Rejections are [`AppError`]s so every malformed request produces the
//! standard envelope.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde_json::{Map, Value};

use roster_core::{FieldError, FromPayload, ListParams, UserId, UserListQuery};

use crate::error::{AppError, ValidationScope};

/// A JSON body validated into `T`.
///
/// Unparseable JSON is rejected before validation; a schema failure reports
/// every violation at once. A body sent without a JSON content type is
/// validated as `{}`.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => value,
            // A body without a JSON content type is read as an empty object.
            Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Map::new()),
            Err(rejection) => return Err(json_rejection(rejection)),
        };

        T::from_payload(&value)
            .map(Self)
            .map_err(|errors| AppError::validation(ValidationScope::Body, errors))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonSyntaxError(r) => AppError::InvalidJson(r.body_text()),
        JsonRejection::JsonDataError(r) => AppError::InvalidJson(r.body_text()),
        other => AppError::InvalidJson(other.body_text()),
    }
}

/// The `{id}` path segment as a positive [`UserId`].
#[derive(Debug, Clone, Copy)]
pub struct UserIdParam(pub UserId);

impl<S> FromRequestParts<S> for UserIdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| id_error("must be a number"))?;

        raw.parse::<UserId>()
            .map(Self)
            .map_err(|e| id_error(&e.to_string()))
    }
}

fn id_error(rule: &str) -> AppError {
    AppError::validation(
        ValidationScope::Params,
        vec![FieldError::new("id", format!("\"id\" {rule}"))],
    )
}

/// List query parameters resolved into a [`UserListQuery`].
#[derive(Debug, Clone)]
pub struct ListQuery(pub UserListQuery);

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation(
                    ValidationScope::Query,
                    vec![FieldError::root(rejection.body_text())],
                )
            })?;

        params
            .resolve()
            .map(Self)
            .map_err(|errors| AppError::validation(ValidationScope::Query, errors))
    }
}
