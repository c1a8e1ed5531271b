//! User-chosen list constraints and the reducer that evolves them.
//!
//! The HTTP handlers build a fresh [`FilterCriteria`] from each query
//! string. [`FilterEvent`] and [`FilterCriteria::apply`] are for Rust
//! clients of this crate that hold list state between requests: apply each
//! interaction, then send the resulting criteria.

use chrono::NaiveDate;

/// Everything a list view lets the user choose. Built fresh for each
/// request or derived from the previous value with [`FilterCriteria::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub provinces: Vec<String>,
    pub category_ids: Vec<i32>,
    pub kinds: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// A single user interaction on a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    Search(String),
    Provinces(Vec<String>),
    Categories(Vec<i32>),
    Kinds(Vec<String>),
    DateRange(Option<NaiveDate>, Option<NaiveDate>),
    NumericRange(Option<i32>, Option<i32>),
    Sort {
        field: String,
        direction: Option<String>,
    },
    Page(usize),
    PageSize(usize),
    /// Clears every filter but keeps the chosen page size.
    Reset,
}

impl FilterCriteria {
    /// Returns the criteria after `event`. Anything but a page change
    /// starts again from the first page.
    #[must_use]
    pub fn apply(self, event: FilterEvent) -> Self {
        let mut next = match event {
            FilterEvent::Page(page) => {
                return Self {
                    page: Some(page),
                    ..self
                };
            }
            FilterEvent::Search(term) => Self {
                search: Some(term),
                ..self
            },
            FilterEvent::Provinces(provinces) => Self { provinces, ..self },
            FilterEvent::Categories(category_ids) => Self {
                category_ids,
                ..self
            },
            FilterEvent::Kinds(kinds) => Self { kinds, ..self },
            FilterEvent::DateRange(date_from, date_to) => Self {
                date_from,
                date_to,
                ..self
            },
            FilterEvent::NumericRange(min, max) => Self { min, max, ..self },
            FilterEvent::Sort { field, direction } => Self {
                sort: Some(field),
                direction,
                ..self
            },
            FilterEvent::PageSize(per_page) => Self {
                per_page: Some(per_page),
                ..self
            },
            FilterEvent::Reset => Self {
                per_page: self.per_page,
                ..Self::default()
            },
        };
        next.page = Some(1);
        next
    }
}
