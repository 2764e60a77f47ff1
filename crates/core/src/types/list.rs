//! List query resolution: free-text search, sort key and paging.
//!
//! Raw query-string values arrive as [`ListParams`] and are resolved into a
//! [`UserListQuery`] that stores can execute directly.

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

/// Default page size when paging is active but no limit was given.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Fields a user list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Email,
    Company,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse a sort field from its API name (`createdAt`, not `created_at`).
    #[must_use]
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "company" => Some(Self::Company),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// The `users` table column backing this field.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A resolved sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    /// Newest records first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl Sort {
    /// Parse a `sort` parameter such as `name` or `-createdAt`.
    ///
    /// Unrecognized field names fall back to the default order instead of
    /// failing the request.
    #[must_use]
    pub fn parse(param: &str) -> Self {
        let param = param.trim();
        let (name, direction) = param
            .strip_prefix('-')
            .map_or((param, SortDirection::Asc), |rest| (rest, SortDirection::Desc));

        SortField::from_param(name).map_or_else(Self::default, |field| Self { field, direction })
    }
}

/// Resolved paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// 1-based page number.
    pub page: u32,
    /// Page size, within `1..=MAX_LIMIT`.
    pub limit: u32,
}

impl Paging {
    /// Build a paging window, flooring page to 1 and clamping limit.
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let limit = limit
            .unwrap_or(i64::from(DEFAULT_LIMIT))
            .clamp(1, i64::from(MAX_LIMIT));

        Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            limit: u32::try_from(limit).unwrap_or(MAX_LIMIT),
        }
    }

    /// Number of rows to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Number of pages needed for `total` rows (at least 1).
    #[must_use]
    pub fn page_count(self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.limit)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Pagination metadata echoed back in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// A fully resolved list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListQuery {
    /// Trimmed, non-empty search term.
    pub search: Option<String>,
    pub sort: Sort,
    /// `None` disables paging: every matching record is returned.
    pub paging: Option<Paging>,
}

/// Raw list query-string parameters.
///
/// Every value is kept as text so that malformed numbers can be reported as
/// field errors instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Resolve raw parameters into an executable query.
    ///
    /// Paging activates when `page` or `limit` is present. Empty values are
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per `page`/`limit` value that is not an
    /// integer.
    pub fn resolve(&self) -> Result<UserListQuery, Vec<FieldError>> {
        let mut errors = Vec::new();
        let page = parse_integer("page", self.page.as_deref(), &mut errors);
        let limit = parse_integer("limit", self.limit.as_deref(), &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let sort = self.sort.as_deref().map_or_else(Sort::default, Sort::parse);

        let paging = (page.is_some() || limit.is_some()).then(|| Paging::new(page, limit));

        Ok(UserListQuery {
            search,
            sort,
            paging,
        })
    }
}

/// `2^63`, the first whole `f64` outside the `i64` range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Parse an optional integer parameter, recording a field error on failure.
///
/// Integral values too large for `i64` saturate rather than fail, since
/// they are clamped afterwards anyway.
fn parse_integer(field: &str, raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<i64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }

    match raw.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)] // range checked in the guard
        Ok(value) if value.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&value) => {
            Some(value as i64)
        }
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            Some(if value.is_sign_negative() { i64::MIN } else { i64::MAX })
        }
        Ok(value) if value.is_finite() => {
            errors.push(FieldError::new(field, format!("\"{field}\" must be an integer")));
            None
        }
        _ => {
            errors.push(FieldError::new(field, format!("\"{field}\" must be a number")));
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> ListParams {
        ListParams {
            page: page.map(str::to_owned),
            limit: limit.map(str::to_owned),
            ..ListParams::default()
        }
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(
            Sort::parse("name"),
            Sort {
                field: SortField::Name,
                direction: SortDirection::Asc
            }
        );
        assert_eq!(
            Sort::parse("-createdAt"),
            Sort {
                field: SortField::CreatedAt,
                direction: SortDirection::Desc
            }
        );
    }

    #[test]
    fn test_sort_unknown_field_falls_back() {
        assert_eq!(Sort::parse("password"), Sort::default());
        assert_eq!(Sort::parse("-phone"), Sort::default());
        assert_eq!(Sort::parse("created_at"), Sort::default());
        assert_eq!(Sort::parse(""), Sort::default());
    }

    #[test]
    fn test_paging_disabled_without_params() {
        let query = ListParams::default().resolve().unwrap();
        assert_eq!(query.paging, None);
        assert_eq!(query.sort, Sort::default());
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_paging_defaults_when_one_param_given() {
        let query = params(Some("3"), None).resolve().unwrap();
        assert_eq!(query.paging, Some(Paging { page: 3, limit: 10 }));

        let query = params(None, Some("25")).resolve().unwrap();
        assert_eq!(query.paging, Some(Paging { page: 1, limit: 25 }));
    }

    #[test]
    fn test_paging_clamps_out_of_range() {
        let query = params(Some("0"), Some("500")).resolve().unwrap();
        assert_eq!(query.paging, Some(Paging { page: 1, limit: 100 }));

        let query = params(Some("-4"), Some("0")).resolve().unwrap();
        assert_eq!(query.paging, Some(Paging { page: 1, limit: 1 }));

        let query = params(None, Some("1e30")).resolve().unwrap();
        assert_eq!(query.paging, Some(Paging { page: 1, limit: 100 }));
    }

    #[test]
    fn test_paging_accepts_whole_number_forms() {
        let query = params(Some("2.0"), Some("20.0")).resolve().unwrap();
        assert_eq!(query.paging, Some(Paging { page: 2, limit: 20 }));

        let query = params(Some("1e1"), Some("5e1")).resolve().unwrap();
        assert_eq!(query.paging, Some(Paging { page: 10, limit: 50 }));
    }

    #[test]
    fn test_paging_rejects_non_integers() {
        let errors = params(Some("two"), Some("2.5")).resolve().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field.as_deref(), Some("page"));
        assert_eq!(errors[0].message, "\"page\" must be a number");
        assert_eq!(errors[1].field.as_deref(), Some("limit"));
        assert_eq!(errors[1].message, "\"limit\" must be an integer");
    }

    #[test]
    fn test_empty_values_are_absent() {
        let query = ListParams {
            search: Some("   ".to_string()),
            page: Some(String::new()),
            ..ListParams::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(query.search, None);
        assert_eq!(query.paging, None);
    }

    #[test]
    fn test_search_is_trimmed() {
        let query = ListParams {
            search: Some("  crona ".to_string()),
            ..ListParams::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(query.search.as_deref(), Some("crona"));
    }

    #[test]
    fn test_offset_and_page_count() {
        let paging = Paging { page: 3, limit: 10 };
        assert_eq!(paging.offset(), 20);
        assert_eq!(paging.page_count(25), 3);
        assert_eq!(paging.page_count(0), 1);
    }
}
