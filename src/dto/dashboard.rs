//! Payload of the dashboard endpoint.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::aggregation::{
    Bucket, PercentBucket, SumBucket, daily_series, image_completeness, monthly_series,
    yearly_series,
};

/// Months covered by the monthly trend, ending with the current month.
pub const TREND_MONTHS: u32 = 12;
/// Days covered by the daily trend, ending today.
pub const TREND_DAYS: u32 = 30;
/// Campaign years covered by the yearly trend, ending with the current year.
pub const TREND_YEARS: u32 = 5;
/// Number of provinces listed on the province charts.
pub const TOP_PROVINCES: usize = 10;

/// First day of the monthly trend that ends with `today`'s month.
pub fn trend_start(today: NaiveDate) -> NaiveDate {
    let month = today.with_day(1).unwrap_or(today);
    month
        .checked_sub_months(Months::new(TREND_MONTHS - 1))
        .unwrap_or(month)
}

/// First year of the yearly trend that ends with `today`'s year.
pub fn first_trend_year(today: NaiveDate) -> i32 {
    today.year() - (TREND_YEARS as i32 - 1)
}

/// Summary cards and chart series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub total_signups: u64,
    pub total_organizations: u64,
    pub total_participants: i64,
    /// Mean signup age rounded to one decimal, 0 without signups.
    pub average_age: f64,
    pub signups_by_province: Vec<Bucket>,
    pub signups_by_category: Vec<Bucket>,
    pub pledge_types: Vec<PercentBucket>,
    pub organizations_by_type: Vec<Bucket>,
    pub organizations_by_category: Vec<Bucket>,
    pub participants_by_province: Vec<SumBucket>,
    pub monthly_signups: Vec<Bucket>,
    pub daily_signups: Vec<Bucket>,
    pub yearly_signups: Vec<Bucket>,
    pub image_completeness: Vec<PercentBucket>,
}

impl DashboardSummary {
    /// All counts zero. Time series and image tiers keep their keys so
    /// charts still render their axes.
    pub fn zeroed(today: NaiveDate) -> Self {
        Self {
            total_signups: 0,
            total_organizations: 0,
            total_participants: 0,
            average_age: 0.0,
            signups_by_province: Vec::new(),
            signups_by_category: Vec::new(),
            pledge_types: Vec::new(),
            organizations_by_type: Vec::new(),
            organizations_by_category: Vec::new(),
            participants_by_province: Vec::new(),
            monthly_signups: monthly_series(std::iter::empty(), trend_start(today), TREND_MONTHS),
            daily_signups: daily_series(std::iter::empty(), today, TREND_DAYS),
            yearly_signups: yearly_series(std::iter::empty(), first_trend_year(today), TREND_YEARS),
            image_completeness: image_completeness(&[]),
        }
    }
}

/// Dashboard response: always a summary, plus an error message when the
/// data source could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPageData {
    pub summary: DashboardSummary,
    pub error: Option<String>,
}
