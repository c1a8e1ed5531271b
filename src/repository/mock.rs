//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::aggregation::Period;

use crate::domain::category::{Category, NewCategory};
use crate::domain::organization::{NewOrganization, Organization, UpdateOrganization};
use crate::domain::signup::{NewSignup, Signup, UpdateSignup};
use crate::domain::types::{CategoryId, OrganizationId, SignupId};
use crate::query::{DateRange, OrganizationListQuery, Predicate, SignupListQuery};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CategoryReader, CategoryWriter, GroupCounts, OrganizationGroup, OrganizationReader,
    OrganizationWriter, PeriodCounts, SignupGroup, SignupReader, SignupWriter,
};

mock! {
    pub Repository {}

    impl CategoryReader for Repository {
        fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    }

    impl CategoryWriter for Repository {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn update_category(
            &self,
            id: CategoryId,
            updates: &NewCategory,
        ) -> RepositoryResult<Category>;
        fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
    }

    impl SignupReader for Repository {
        fn get_signup_by_id(&self, id: SignupId) -> RepositoryResult<Option<Signup>>;
        fn list_signups(&self, query: &SignupListQuery) -> RepositoryResult<(usize, Vec<Signup>)>;
        fn count_signups(&self, predicate: &Predicate) -> RepositoryResult<usize>;
        fn count_signups_by(&self, group: SignupGroup) -> RepositoryResult<GroupCounts>;
        fn count_signups_per_period(
            &self,
            period: Period,
            created: DateRange,
        ) -> RepositoryResult<PeriodCounts>;
        fn signup_age_totals(&self) -> RepositoryResult<(u64, i64)>;
    }

    impl SignupWriter for Repository {
        fn create_signup(&self, new_signup: &NewSignup) -> RepositoryResult<Signup>;
        fn update_signup(&self, id: SignupId, updates: &UpdateSignup) -> RepositoryResult<Signup>;
        fn delete_signup(&self, id: SignupId) -> RepositoryResult<()>;
    }

    impl OrganizationReader for Repository {
        fn get_organization_by_id(
            &self,
            id: OrganizationId,
        ) -> RepositoryResult<Option<Organization>>;
        fn list_organizations(
            &self,
            query: &OrganizationListQuery,
        ) -> RepositoryResult<(usize, Vec<Organization>)>;
        fn count_organizations_by(&self, group: OrganizationGroup) -> RepositoryResult<GroupCounts>;
        fn sum_participants_by_province(&self) -> RepositoryResult<Vec<(Option<String>, i64)>>;
        fn count_organizations_by_images(&self) -> RepositoryResult<Vec<(usize, u64)>>;
    }

    impl OrganizationWriter for Repository {
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
}
