//! Create and edit forms.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use roster_core::{CreateUserRequest, ReplaceUserRequest, UserId};

use super::flash::{self, Flash};
use super::form::{FormErrors, Submission, UserForm};
use super::{PageError, parse_id};
use crate::db::RepositoryError;
use crate::state::AppState;

/// Shown above the form when the form rules reject a submission.
const FIX_ERRORS: &str = "Please fix the errors below.";

/// Create / edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub cancel_href: String,
    pub form: UserForm,
    pub errors: FormErrors,
    pub form_error: Option<String>,
    pub flash: Option<Flash>,
}

impl UserFormTemplate {
    fn create(form: UserForm) -> Self {
        Self {
            heading: "Add New User",
            action: "/users/new".to_string(),
            submit_label: "Create User",
            cancel_href: "/users".to_string(),
            form,
            errors: FormErrors::default(),
            form_error: None,
            flash: None,
        }
    }

    fn edit(id: UserId, form: UserForm) -> Self {
        Self {
            heading: "Edit User",
            action: format!("/users/{id}/edit"),
            submit_label: "Save Changes",
            cancel_href: format!("/users/{id}"),
            form,
            errors: FormErrors::default(),
            form_error: None,
            flash: None,
        }
    }

    /// Re-render after the form rules failed.
    fn invalid(mut self, errors: FormErrors) -> Response {
        self.errors = errors;
        self.form_error = Some(FIX_ERRORS.to_string());
        (StatusCode::UNPROCESSABLE_ENTITY, self).into_response()
    }

    /// Re-render after the store refused the submission.
    fn rejected(mut self, status: StatusCode, message: &str, errors: FormErrors) -> Response {
        self.errors = errors;
        self.form_error = Some(message.to_string());
        self.flash = Some(Flash::error(message));
        (status, self).into_response()
    }
}

/// Map a store conflict onto the form, or pass the error through.
fn conflict_errors(err: RepositoryError) -> Result<(String, FormErrors), PageError> {
    match err {
        RepositoryError::Conflict { field, .. } => {
            let message = if field == "email" {
                "Email already exists"
            } else {
                "Unique constraint violation"
            };
            let mut errors = FormErrors::default();
            errors.insert(field, message);
            Ok((message.to_string(), errors))
        }
        other => Err(other.into()),
    }
}

/// Empty create form.
///
/// GET /users/new
#[allow(clippy::unused_async)]
pub async fn new() -> UserFormTemplate {
    UserFormTemplate::create(UserForm::default())
}

/// Handle the create form.
///
/// POST /users/new
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserForm>,
) -> Result<Response, PageError> {
    let request: CreateUserRequest = match form.submit() {
        Submission::Valid(request) => request,
        Submission::Invalid(errors) => return Ok(UserFormTemplate::create(form).invalid(errors)),
        Submission::Rejected(errors) => {
            return Ok(UserFormTemplate::create(form).rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed",
                errors,
            ));
        }
    };

    match state.store().create(request.into_inner()).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User created from dashboard");
            flash::push(&session, Flash::success("User created successfully")).await;
            Ok(Redirect::to("/users").into_response())
        }
        Err(err) => {
            let (message, errors) = conflict_errors(err)?;
            Ok(UserFormTemplate::create(form).rejected(StatusCode::CONFLICT, &message, errors))
        }
    }
}

/// Edit form pre-filled with the stored user.
///
/// GET /users/{id}/edit
#[instrument(skip(state))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<UserFormTemplate, PageError> {
    let id = parse_id(&id)?;
    let user = state.store().get(id).await?.ok_or(PageError::NotFound)?;
    Ok(UserFormTemplate::edit(id, UserForm::from(&user)))
}

/// Handle the edit form as a full replace.
///
/// POST /users/{id}/edit
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<UserForm>,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    let request: ReplaceUserRequest = match form.submit() {
        Submission::Valid(request) => request,
        Submission::Invalid(errors) => return Ok(UserFormTemplate::edit(id, form).invalid(errors)),
        Submission::Rejected(errors) => {
            return Ok(UserFormTemplate::edit(id, form).rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed",
                errors,
            ));
        }
    };

    match state.store().replace(id, request.into_inner()).await {
        Ok(Some(user)) => {
            tracing::info!(user_id = %user.id, "User updated from dashboard");
            flash::push(&session, Flash::success("User updated successfully")).await;
            Ok(Redirect::to(&format!("/users/{id}")).into_response())
        }
        Ok(None) => Err(PageError::NotFound),
        Err(err) => {
            let (message, errors) = conflict_errors(err)?;
            Ok(UserFormTemplate::edit(id, form).rejected(StatusCode::CONFLICT, &message, errors))
        }
    }
}
