//! Dashboard summary: totals, category breakdowns and trends computed from
//! grouped queries over the whole data set.

use chrono::{Days, NaiveDate};

use crate::aggregation::{
    Period, daily_series, image_completeness, merge_counts, merge_sums, monthly_series,
    percentages, top_n, yearly_series,
};
use crate::dto::dashboard::{
    DashboardPageData, DashboardSummary, TOP_PROVINCES, TREND_DAYS, TREND_MONTHS, TREND_YEARS,
    first_trend_year, trend_start,
};
use crate::query::DateRange;
use crate::repository::{OrganizationGroup, OrganizationReader, SignupGroup, SignupReader};
use crate::services::ServiceResult;

/// Shown instead of the charts when the data source is unavailable.
pub const DASHBOARD_UNAVAILABLE: &str = "ไม่สามารถโหลดข้อมูลแดชบอร์ดได้ กรุณาลองใหม่อีกครั้ง";

/// Builds the dashboard for `today`. Never fails: when any query fails the
/// error is logged and a zeroed summary is returned with a message.
pub fn load_dashboard<R>(repo: &R, today: NaiveDate) -> DashboardPageData
where
    R: SignupReader + OrganizationReader + ?Sized,
{
    match build_summary(repo, today) {
        Ok(summary) => DashboardPageData {
            summary,
            error: None,
        },
        Err(e) => {
            log::error!("Failed to build dashboard: {e}");
            DashboardPageData {
                summary: DashboardSummary::zeroed(today),
                error: Some(DASHBOARD_UNAVAILABLE.to_string()),
            }
        }
    }
}

fn average(total: i64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (total as f64 / count as f64 * 10.0).round() / 10.0
}

fn build_summary<R>(repo: &R, today: NaiveDate) -> ServiceResult<DashboardSummary>
where
    R: SignupReader + OrganizationReader + ?Sized,
{
    let (total_signups, age_total) = repo.signup_age_totals()?;

    let signups_by_province = top_n(
        merge_counts(repo.count_signups_by(SignupGroup::Province)?),
        TOP_PROVINCES,
    );
    let signups_by_category = merge_counts(repo.count_signups_by(SignupGroup::Category)?);
    let pledge_types = percentages(
        &merge_counts(repo.count_signups_by(SignupGroup::PledgeType)?),
        total_signups,
    );

    let organizations_by_type =
        merge_counts(repo.count_organizations_by(OrganizationGroup::OrganizationType)?);
    let total_organizations = organizations_by_type.iter().map(|b| b.count).sum();
    let organizations_by_category =
        merge_counts(repo.count_organizations_by(OrganizationGroup::Category)?);

    let participants = merge_sums(repo.sum_participants_by_province()?);
    let total_participants = participants.iter().map(|b| b.total).sum();

    let first_month = trend_start(today);
    let monthly = repo.count_signups_per_period(
        Period::Month,
        DateRange::from_days(Some(first_month), Some(today)),
    )?;
    let first_day = today
        .checked_sub_days(Days::new(u64::from(TREND_DAYS - 1)))
        .unwrap_or(today);
    let daily = repo.count_signups_per_period(
        Period::Day,
        DateRange::from_days(Some(first_day), Some(today)),
    )?;
    let first_year = first_trend_year(today);
    let yearly = repo.count_signups_per_period(
        Period::Year,
        DateRange::from_days(NaiveDate::from_ymd_opt(first_year, 1, 1), Some(today)),
    )?;

    Ok(DashboardSummary {
        total_signups,
        total_organizations,
        total_participants,
        average_age: average(age_total, total_signups),
        signups_by_province,
        signups_by_category,
        pledge_types,
        organizations_by_type,
        organizations_by_category,
        participants_by_province: top_n(participants, TOP_PROVINCES),
        monthly_signups: monthly_series(monthly, first_month, TREND_MONTHS),
        daily_signups: daily_series(daily, today, TREND_DAYS),
        yearly_signups: yearly_series(yearly, first_year, TREND_YEARS),
        image_completeness: image_completeness(&repo.count_organizations_by_images()?),
    })
}

#[cfg(test)]
mod average_tests {
    use super::average;

    #[test]
    fn average_is_rounded_to_one_decimal() {
        assert_eq!(average(0, 0), 0.0);
        assert_eq!(average(100, 3), 33.3);
        assert_eq!(average(90, 2), 45.0);
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::aggregation::UNKNOWN_LABEL;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()
    }

    fn populated_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_signup_age_totals().returning(|| Ok((4, 150)));
        repo.expect_count_signups_by().returning(|group| {
            Ok(match group {
                SignupGroup::Province => vec![
                    (Some("ตาก".to_string()), 1),
                    (None, 1),
                    (Some("น่าน".to_string()), 2),
                ],
                SignupGroup::Category => vec![(Some("วัด".to_string()), 4)],
                SignupGroup::PledgeType => vec![
                    (Some("งดตลอดพรรษา".to_string()), 3),
                    (Some("ลดการดื่ม".to_string()), 1),
                ],
            })
        });
        repo.expect_count_organizations_by().returning(|group| {
            Ok(match group {
                OrganizationGroup::OrganizationType => vec![(Some("school".to_string()), 2)],
                _ => vec![(None, 2)],
            })
        });
        repo.expect_sum_participants_by_province()
            .returning(|| Ok(vec![(Some("ตาก".to_string()), 40), (None, 10)]));
        repo.expect_count_signups_per_period()
            .returning(|period, created| {
                let first_day = created.start.map(|start| start.date());
                let end = created.end.map(|end| end.date());
                assert_eq!(end, NaiveDate::from_ymd_opt(2025, 8, 16));
                Ok(match period {
                    Period::Month => {
                        assert_eq!(first_day, NaiveDate::from_ymd_opt(2024, 9, 1));
                        vec![("2025-08".to_string(), 1), ("2024-09".to_string(), 2)]
                    }
                    Period::Day => {
                        assert_eq!(first_day, NaiveDate::from_ymd_opt(2025, 7, 17));
                        vec![("2025-08-14".to_string(), 1)]
                    }
                    Period::Year => {
                        assert_eq!(first_day, NaiveDate::from_ymd_opt(2021, 1, 1));
                        vec![("2024".to_string(), 2), ("2025".to_string(), 3)]
                    }
                })
            });
        repo.expect_count_organizations_by_images()
            .returning(|| Ok(vec![(4, 1), (0, 1)]));
        repo
    }

    #[test]
    fn summary_is_built_from_grouped_queries() {
        let data = load_dashboard(&populated_repo(), today());
        assert!(data.error.is_none());

        let summary = data.summary;
        assert_eq!(summary.total_signups, 4);
        assert_eq!(summary.average_age, 37.5);
        assert_eq!(summary.total_organizations, 2);
        assert_eq!(summary.total_participants, 50);
        assert_eq!(summary.signups_by_province[0].label, "น่าน");
        assert_eq!(summary.signups_by_province[2].label, UNKNOWN_LABEL);
        assert_eq!(summary.pledge_types[0].percent, 75);
        assert_eq!(summary.pledge_types[1].percent, 25);
        assert_eq!(summary.monthly_signups.last().map(|b| b.count), Some(1));
        assert_eq!(summary.monthly_signups[0].count, 2);
        assert_eq!(summary.daily_signups[28].count, 1);
        let yearly: Vec<u64> = summary.yearly_signups.iter().map(|b| b.count).collect();
        assert_eq!(yearly, vec![0, 0, 0, 2, 3]);
        assert_eq!(summary.image_completeness[0].percent, 50);
    }

    #[test]
    fn failing_source_yields_zeroed_summary() {
        let mut repo = MockRepository::new();
        repo.expect_signup_age_totals()
            .returning(|| Err(RepositoryError::ConnectionError("down".into())));

        let data = load_dashboard(&repo, today());
        assert_eq!(data.error.as_deref(), Some(DASHBOARD_UNAVAILABLE));
        assert_eq!(data.summary, DashboardSummary::zeroed(today()));
    }
}
