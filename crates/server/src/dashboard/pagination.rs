//! Dashboard list state and page-number links.
//!
//! The list view keeps all of its state in the query string so every view is
//! bookmarkable. Parameters are parsed leniently: anything unrecognized falls
//! back to the default instead of producing an error page.

use serde::Deserialize;

use roster_core::{Paging, Sort, SortDirection, SortField, UserListQuery};

/// Page sizes offered in the dashboard.
pub const PAGE_SIZES: [u32; 3] = [DEFAULT_PAGE_SIZE, 20, 50];

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pages shown on either side of the current one before collapsing to a gap.
const WINDOW: u32 = 2;

/// Sort options offered by the dashboard select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortChoice {
    #[default]
    Recent,
    NameAsc,
    NameDesc,
}

impl SortChoice {
    pub const ALL: [Self; 3] = [Self::Recent, Self::NameAsc, Self::NameDesc];

    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value {
            "az" => Self::NameAsc,
            "za" => Self::NameDesc,
            _ => Self::Recent,
        }
    }

    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::NameAsc => "az",
            Self::NameDesc => "za",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recent => "Most recent",
            Self::NameAsc => "Name (A-Z)",
            Self::NameDesc => "Name (Z-A)",
        }
    }

    /// The store ordering this option maps to.
    #[must_use]
    pub const fn sort(self) -> Sort {
        match self {
            Self::Recent => Sort {
                field: SortField::CreatedAt,
                direction: SortDirection::Desc,
            },
            Self::NameAsc => Sort {
                field: SortField::Name,
                direction: SortDirection::Asc,
            },
            Self::NameDesc => Sort {
                field: SortField::Name,
                direction: SortDirection::Desc,
            },
        }
    }
}

/// Raw dashboard query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListPageParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub company: Option<String>,
}

/// Resolved list state for the dashboard.
///
/// `company` filters the rows of the current page only; an empty value
/// shows every company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub search: String,
    pub sort: SortChoice,
    pub page: u32,
    pub limit: u32,
    pub company: String,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortChoice::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            company: String::new(),
        }
    }
}

impl From<ListPageParams> for ListState {
    fn from(params: ListPageParams) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        let limit = params
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| PAGE_SIZES.contains(l))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            search: params.search.unwrap_or_default().trim().to_string(),
            sort: params
                .sort
                .as_deref()
                .map(SortChoice::from_param)
                .unwrap_or_default(),
            page,
            limit,
            company: params.company.unwrap_or_default().trim().to_string(),
        }
    }
}

impl ListState {
    /// Store query for this state. The dashboard always pages.
    #[must_use]
    pub fn to_query(&self) -> UserListQuery {
        UserListQuery {
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            sort: self.sort.sort(),
            paging: Some(Paging {
                page: self.page,
                limit: self.limit,
            }),
        }
    }

    /// URL of `page` with the rest of the state preserved.
    #[must_use]
    pub fn href(&self, page: u32) -> String {
        let mut url = String::from("/users?");
        if !self.search.is_empty() {
            url.push_str("search=");
            url.push_str(&urlencoding::encode(&self.search));
            url.push('&');
        }
        url.push_str(&format!(
            "sort={}&page={page}&limit={}",
            self.sort.as_param(),
            self.limit
        ));
        if !self.company.is_empty() {
            url.push_str("&company=");
            url.push_str(&urlencoding::encode(&self.company));
        }
        url
    }
}

/// One entry in the page-number strip. `number` is `None` for a gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: Option<u32>,
    pub href: String,
    pub current: bool,
}

impl PageLink {
    const fn gap() -> Self {
        Self {
            number: None,
            href: String::new(),
            current: false,
        }
    }
}

/// Everything the pagination bar renders.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub links: Vec<PageLink>,
}

impl Pagination {
    #[must_use]
    pub fn new(state: &ListState, total: u64) -> Self {
        let paging = Paging {
            page: state.page,
            limit: state.limit,
        };
        let total_pages = paging.page_count(total);
        let page = state.page;

        let prev_href = (page > 1).then(|| state.href(page - 1));
        let next_href = (page < total_pages).then(|| state.href(page + 1));

        let mut links = Vec::new();
        let mut last_shown = 0;
        for number in 1..=total_pages {
            let near = number.abs_diff(page) <= WINDOW;
            if number == 1 || number == total_pages || near {
                if number > last_shown + 1 {
                    links.push(PageLink::gap());
                }
                links.push(PageLink {
                    number: Some(number),
                    href: state.href(number),
                    current: number == page,
                });
                last_shown = number;
            }
        }

        Self {
            page,
            total_pages,
            total,
            prev_href,
            next_href,
            links,
        }
    }
}
