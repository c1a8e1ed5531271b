//! Data-source access for the campaign tables.
//!
//! Traits are split into readers and writers so services can ask for the
//! narrowest capability they need. [`DieselRepository`] implements all of
//! them over the SQLite pool.

use crate::{
    aggregation::Period,
    db::{DbConnection, DbPool, get_connection},
    domain::{
        category::{Category, NewCategory},
        organization::{NewOrganization, Organization, UpdateOrganization},
        signup::{NewSignup, Signup, UpdateSignup},
        types::{CategoryId, OrganizationId, SignupId},
    },
    query::{DateRange, OrganizationListQuery, Predicate, SignupListQuery},
    repository::errors::RepositoryResult,
};

/// Orders a boxed query by `$column`, breaking ties by `$id` in the same
/// direction so repeated reads return identical pages.
macro_rules! sort_boxed {
    ($query:expr, $column:expr, $id:expr, $direction:expr) => {
        match $direction {
            $crate::query::SortDirection::Asc => {
                $query.order($column.asc()).then_order_by($id.asc())
            }
            $crate::query::SortDirection::Desc => {
                $query.order($column.desc()).then_order_by($id.desc())
            }
        }
    };
}

pub mod category;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod organization;
pub mod signup;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

/// Categorical fields signups can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupGroup {
    Province,
    Category,
    PledgeType,
}

/// Categorical fields organizations can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationGroup {
    Province,
    Category,
    OrganizationType,
}

/// Raw `GROUP BY` output: the grouped value (NULL as `None`) and its row count.
pub type GroupCounts = Vec<(Option<String>, u64)>;

/// Row counts keyed by [`Period::pattern`] label, e.g. `2025-07`.
pub type PeriodCounts = Vec<(String, u64)>;

/// Orders `(key, value, MIN(id))` group rows by the first row of each group
/// and drops the id, so merged buckets keep first-seen order among ties.
fn first_seen<K, V>(mut rows: Vec<(K, V, Option<i32>)>) -> Vec<(K, V)> {
    rows.sort_by_key(|(_, _, first_id)| *first_id);
    rows.into_iter().map(|(key, value, _)| (key, value)).collect()
}

pub trait CategoryReader {
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        id: CategoryId,
        updates: &NewCategory,
    ) -> RepositoryResult<Category>;
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
}

pub trait SignupReader {
    fn get_signup_by_id(&self, id: SignupId) -> RepositoryResult<Option<Signup>>;
    /// Total matching rows and the requested page, read in one transaction.
    /// The page is clamped to the last existing page.
    fn list_signups(&self, query: &SignupListQuery) -> RepositoryResult<(usize, Vec<Signup>)>;
    /// Number of matching rows without loading any of them.
    fn count_signups(&self, predicate: &Predicate) -> RepositoryResult<usize>;
    /// Row counts per value of `group` over the whole table, in the order
    /// each value first appears. Category groups are keyed by category name.
    fn count_signups_by(&self, group: SignupGroup) -> RepositoryResult<GroupCounts>;
    /// Signups created within `created`, counted per calendar `period`.
    /// Periods without rows are absent.
    fn count_signups_per_period(
        &self,
        period: Period,
        created: DateRange,
    ) -> RepositoryResult<PeriodCounts>;
    /// Number of signups and the sum of their ages.
    fn signup_age_totals(&self) -> RepositoryResult<(u64, i64)>;
}

pub trait SignupWriter {
    fn create_signup(&self, new_signup: &NewSignup) -> RepositoryResult<Signup>;
    fn update_signup(&self, id: SignupId, updates: &UpdateSignup) -> RepositoryResult<Signup>;
    fn delete_signup(&self, id: SignupId) -> RepositoryResult<()>;
}

pub trait OrganizationReader {
    fn get_organization_by_id(&self, id: OrganizationId)
    -> RepositoryResult<Option<Organization>>;
    /// Total matching rows and the requested page, read in one transaction.
    fn list_organizations(
        &self,
        query: &OrganizationListQuery,
    ) -> RepositoryResult<(usize, Vec<Organization>)>;
    fn count_organizations_by(&self, group: OrganizationGroup) -> RepositoryResult<GroupCounts>;
    /// Sum of reported participants per province, in first-seen order.
    fn sum_participants_by_province(&self) -> RepositoryResult<Vec<(Option<String>, i64)>>;
    /// `(attached images, organizations)` pairs.
    fn count_organizations_by_images(&self) -> RepositoryResult<Vec<(usize, u64)>>;
}

pub trait OrganizationWriter {
    fn create_organization(
        &self,
        new_organization: &NewOrganization,
    ) -> RepositoryResult<Organization>;
    fn update_organization(
        &self,
        id: OrganizationId,
        updates: &UpdateOrganization,
    ) -> RepositoryResult<Organization>;
    fn delete_organization(&self, id: OrganizationId) -> RepositoryResult<()>;
}
