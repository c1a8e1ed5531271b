//! Query building: turns user-supplied [`FilterCriteria`] into a normalized
//! [`ListQuery`] that the repository executes.
//!
//! Normalization never fails. Unknown sort fields, unsupported page sizes
//! and out-of-range pages all fall back to defaults.

use std::fmt::Debug;

use serde::Serialize;

use crate::pagination::{ALLOWED_PAGE_SIZES, DEFAULT_ITEMS_PER_PAGE, PageWindow, Pagination};

pub mod criteria;
pub mod predicate;

pub use criteria::{FilterCriteria, FilterEvent};
pub use predicate::{
    DateRange, Filterable, NumericRange, Predicate, like_pattern, national_phone_digits,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Allow-listed sort column of one entity. `Default` is the creation
/// timestamp.
pub trait SortKey: Copy + Default + Debug + PartialEq {
    fn parse(name: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignupSort {
    #[default]
    CreatedAt,
    FirstName,
    LastName,
    Province,
    Age,
}

impl SortKey for SignupSort {
    fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "created_at" => Some(SignupSort::CreatedAt),
            "first_name" => Some(SignupSort::FirstName),
            "last_name" => Some(SignupSort::LastName),
            "province" => Some(SignupSort::Province),
            "age" => Some(SignupSort::Age),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrganizationSort {
    #[default]
    CreatedAt,
    Name,
    Province,
    Participants,
}

impl SortKey for OrganizationSort {
    fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "created_at" => Some(OrganizationSort::CreatedAt),
            "name" => Some(OrganizationSort::Name),
            "province" => Some(OrganizationSort::Province),
            "participants" => Some(OrganizationSort::Participants),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort<S: SortKey> {
    pub key: S,
    pub direction: SortDirection,
}

impl<S: SortKey> Sort<S> {
    /// Resolves a requested sort. An unknown or missing field yields the
    /// default (newest first); a bad direction on a known field yields
    /// descending.
    pub fn resolve(field: Option<&str>, direction: Option<&str>) -> Self {
        match field.and_then(S::parse) {
            Some(key) => Self {
                key,
                direction: direction.and_then(SortDirection::parse).unwrap_or_default(),
            },
            None => Self::default(),
        }
    }
}

/// Coerces a requested page size onto [`ALLOWED_PAGE_SIZES`].
pub fn normalize_page_size(per_page: Option<usize>) -> usize {
    per_page
        .filter(|size| ALLOWED_PAGE_SIZES.contains(size))
        .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
}

/// A normalized list request: predicate, ordering and optional page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<S: SortKey> {
    pub predicate: Predicate,
    pub sort: Sort<S>,
    pub pagination: Option<Pagination>,
}

pub type SignupListQuery = ListQuery<SignupSort>;
pub type OrganizationListQuery = ListQuery<OrganizationSort>;

impl<S: SortKey> Default for ListQuery<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SortKey> ListQuery<S> {
    /// An open query: every row, newest first, no pagination.
    pub fn new() -> Self {
        Self {
            predicate: Predicate::default(),
            sort: Sort::default(),
            pagination: None,
        }
    }

    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            predicate: Predicate::from_criteria(criteria),
            sort: Sort::resolve(criteria.sort.as_deref(), criteria.direction.as_deref()),
            pagination: Some(Pagination::new(
                criteria.page.unwrap_or(1).max(1),
                normalize_page_size(criteria.per_page),
            )),
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_string();
        self.predicate.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn sort_by(mut self, key: S, direction: SortDirection) -> Self {
        self.sort = Sort { key, direction };
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page.max(1), per_page));
        self
    }

    /// Drops pagination, e.g. for exports of the whole filtered set.
    pub fn unpaginated(mut self) -> Self {
        self.pagination = None;
        self
    }

    /// Resolved page for `total` matching rows. An unpaginated query is one
    /// page holding every row.
    pub fn window(&self, total: usize) -> PageWindow {
        match self.pagination {
            Some(pagination) => pagination.window(total),
            None => PageWindow::new(1, total.max(1), total),
        }
    }

    /// Page size that will be used when rendering, even if unpaginated.
    pub fn per_page(&self) -> usize {
        self.pagination
            .map(|p| p.per_page)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
    }
}
