//! User list page.

use std::collections::BTreeSet;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tower_sessions::Session;
use tracing::instrument;

use roster_core::User;

use super::PageError;
use super::flash::{self, Flash};
use super::pagination::{ListPageParams, ListState, PAGE_SIZES, Pagination, SortChoice};
use crate::filters;
use crate::state::AppState;

/// An `<option>` in one of the list controls.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// User list page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub users: Vec<User>,
    pub search: String,
    pub sort: &'static str,
    pub limit: u32,
    pub sort_options: Vec<SelectOption>,
    pub limit_options: Vec<SelectOption>,
    pub company: String,
    pub company_options: Vec<SelectOption>,
    pub pagination: Pagination,
    pub flash: Option<Flash>,
}

/// Display the user list.
///
/// GET /users?search=&sort=&page=&limit=&company=
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListPageParams>,
) -> Result<UsersIndexTemplate, PageError> {
    let list = ListState::from(params);
    let page = state.store().list(&list.to_query()).await?;
    let total = page
        .total
        .unwrap_or_else(|| u64::try_from(page.users.len()).unwrap_or(u64::MAX));

    let sort_options = SortChoice::ALL
        .iter()
        .map(|choice| SelectOption {
            value: choice.as_param().to_string(),
            label: choice.label().to_string(),
            selected: *choice == list.sort,
        })
        .collect();

    let limit_options = PAGE_SIZES
        .iter()
        .map(|size| SelectOption {
            value: size.to_string(),
            label: format!("{size} / page"),
            selected: *size == list.limit,
        })
        .collect();

    let company_options = company_options(&page.users, &list.company);
    let users = page
        .users
        .into_iter()
        .filter(|user| list.company.is_empty() || user.company == list.company)
        .collect();

    Ok(UsersIndexTemplate {
        users,
        pagination: Pagination::new(&list, total),
        search: list.search,
        sort: list.sort.as_param(),
        limit: list.limit,
        sort_options,
        limit_options,
        company_options,
        flash: flash::take(&session).await,
        company: list.company,
    })
}

/// Distinct companies on the loaded page, sorted by name.
fn company_options(users: &[User], selected: &str) -> Vec<SelectOption> {
    let companies: BTreeSet<&str> = users.iter().map(|user| user.company.as_str()).collect();
    companies
        .into_iter()
        .map(|company| SelectOption {
            value: company.to_string(),
            label: company.to_string(),
            selected: company == selected,
        })
        .collect()
}
