//! Query parameters and response envelope for list endpoints.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dto::ErrorBody;
use crate::pagination::Paginated;
use crate::query::FilterCriteria;
use crate::sequence::Ticket;

/// Raw list query string. Every value is kept as text so a malformed
/// parameter is dropped instead of failing the whole request.
///
/// Multi-valued filters repeat the key: `?province=A&province=B`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    #[serde(default)]
    pub province: Vec<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default, rename = "type")]
    pub kind: Vec<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub seq: Option<String>,
}

fn parse_opt<T: FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|raw| raw.trim().parse().ok())
}

fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    value
        .as_deref()
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
}

impl ListParams {
    /// Parses a query string, treating an unreadable one as empty.
    pub fn from_query(query: &str) -> Self {
        serde_html_form::from_str(query).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed list query `{query}`: {err}");
            Self::default()
        })
    }

    pub fn ticket(&self) -> Option<Ticket> {
        parse_opt::<u64>(&self.seq).map(Ticket::new)
    }
}

impl From<&ListParams> for FilterCriteria {
    fn from(params: &ListParams) -> Self {
        Self {
            search: params.search.clone(),
            provinces: params.province.clone(),
            category_ids: params
                .category
                .iter()
                .filter_map(|raw| raw.trim().parse().ok())
                .collect(),
            kinds: params.kind.clone(),
            date_from: parse_date(&params.from),
            date_to: parse_date(&params.to),
            min: parse_opt(&params.min),
            max: parse_opt(&params.max),
            sort: params.sort.clone(),
            direction: params.direction.clone(),
            page: parse_opt(&params.page),
            per_page: parse_opt(&params.per_page),
        }
    }
}

/// One page of a list plus the echoed request ticket. On failure `items`
/// is empty and the error fields are set.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    #[serde(flatten)]
    pub page: Paginated<T>,
    pub seq: Option<Ticket>,
    #[serde(flatten)]
    pub failure: Option<ErrorBody>,
}

impl<T> ListResponse<T> {
    pub fn new(page: Paginated<T>, seq: Option<Ticket>) -> Self {
        Self {
            page,
            seq,
            failure: None,
        }
    }

    pub fn failed(per_page: usize, seq: Option<Ticket>, failure: ErrorBody) -> Self {
        Self {
            page: Paginated::empty(per_page),
            seq,
            failure: Some(failure),
        }
    }
}
