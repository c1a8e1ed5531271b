use crate::domain::organization::{NewOrganization, Organization, UpdateOrganization};
use crate::domain::types::OrganizationId;
use crate::forms::organization::OrganizationForm;
use crate::pagination::Paginated;
use crate::query::{FilterCriteria, OrganizationListQuery};
use crate::repository::{OrganizationReader, OrganizationWriter};
use crate::services::{ServiceError, ServiceResult};

fn organization_id(raw: i32) -> ServiceResult<OrganizationId> {
    OrganizationId::new(raw).map_err(|_| ServiceError::NotFound)
}

/// Loads one page of organizations matching `criteria`.
pub fn load_organization_list<R>(
    repo: &R,
    criteria: &FilterCriteria,
) -> ServiceResult<Paginated<Organization>>
where
    R: OrganizationReader + ?Sized,
{
    let query = OrganizationListQuery::from_criteria(criteria);
    let (total, organizations) = repo.list_organizations(&query).map_err(|e| {
        log::error!("Failed to list organizations: {e}");
        ServiceError::from(e)
    })?;

    Ok(Paginated::new(organizations, query.window(total)))
}

pub fn get_organization<R>(repo: &R, id: i32) -> ServiceResult<Organization>
where
    R: OrganizationReader + ?Sized,
{
    match repo.get_organization_by_id(organization_id(id)?) {
        Ok(Some(organization)) => Ok(organization),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get organization {id}: {e}");
            Err(e.into())
        }
    }
}

pub fn create_organization<R>(repo: &R, form: OrganizationForm) -> ServiceResult<Organization>
where
    R: OrganizationWriter + ?Sized,
{
    let new_organization = NewOrganization::try_from(form)?;
    repo.create_organization(&new_organization).map_err(|e| {
        log::error!("Failed to create organization: {e}");
        ServiceError::from(e)
    })
}

pub fn update_organization<R>(
    repo: &R,
    id: i32,
    form: OrganizationForm,
) -> ServiceResult<Organization>
where
    R: OrganizationWriter + ?Sized,
{
    let id = organization_id(id)?;
    let updates = UpdateOrganization::try_from(form)?;
    repo.update_organization(id, &updates).map_err(|e| {
        log::error!("Failed to update organization {id}: {e}");
        ServiceError::from(e)
    })
}

pub fn delete_organization<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: OrganizationWriter + ?Sized,
{
    let id = organization_id(id)?;
    repo.delete_organization(id).map_err(|e| {
        log::error!("Failed to delete organization {id}: {e}");
        ServiceError::from(e)
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::query::OrganizationSort;
    use crate::query::SortDirection;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    #[test]
    fn sort_and_filters_reach_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_list_organizations()
            .withf(|query| {
                query.sort.key == OrganizationSort::Participants
                    && query.sort.direction == SortDirection::Asc
                    && query.predicate.kinds == vec!["school".to_string()]
                    && query.predicate.amount.min == Some(10)
            })
            .returning(|_| Ok((0, Vec::new())));

        let criteria = FilterCriteria {
            kinds: vec!["school".to_string()],
            min: Some(10),
            sort: Some("participants".to_string()),
            direction: Some("asc".to_string()),
            ..Default::default()
        };
        let page = load_organization_list(&repo, &criteria).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn deleting_missing_organization_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_organization()
            .returning(|_| Err(RepositoryError::NotFound));

        assert!(matches!(
            delete_organization(&repo, 3),
            Err(ServiceError::NotFound)
        ));
    }
}
