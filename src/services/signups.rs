use crate::domain::signup::{NewSignup, Signup, UpdateSignup};
use crate::domain::types::SignupId;
use crate::forms::signup::SignupForm;
use crate::pagination::Paginated;
use crate::query::{FilterCriteria, SignupListQuery};
use crate::repository::{SignupReader, SignupWriter};
use crate::services::{ServiceError, ServiceResult};

fn signup_id(raw: i32) -> ServiceResult<SignupId> {
    SignupId::new(raw).map_err(|_| ServiceError::NotFound)
}

/// Loads one page of signups matching `criteria`. The page number is
/// clamped to the last existing page.
pub fn load_signup_list<R>(repo: &R, criteria: &FilterCriteria) -> ServiceResult<Paginated<Signup>>
where
    R: SignupReader + ?Sized,
{
    let query = SignupListQuery::from_criteria(criteria);
    let (total, signups) = repo.list_signups(&query).map_err(|e| {
        log::error!("Failed to list signups: {e}");
        ServiceError::from(e)
    })?;

    Ok(Paginated::new(signups, query.window(total)))
}

pub fn get_signup<R>(repo: &R, id: i32) -> ServiceResult<Signup>
where
    R: SignupReader + ?Sized,
{
    match repo.get_signup_by_id(signup_id(id)?) {
        Ok(Some(signup)) => Ok(signup),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get signup {id}: {e}");
            Err(e.into())
        }
    }
}

pub fn create_signup<R>(repo: &R, form: SignupForm) -> ServiceResult<Signup>
where
    R: SignupWriter + ?Sized,
{
    let new_signup = NewSignup::try_from(form)?;
    repo.create_signup(&new_signup).map_err(|e| {
        log::error!("Failed to create signup: {e}");
        ServiceError::from(e)
    })
}

pub fn update_signup<R>(repo: &R, id: i32, form: SignupForm) -> ServiceResult<Signup>
where
    R: SignupWriter + ?Sized,
{
    let id = signup_id(id)?;
    let updates = UpdateSignup::try_from(form)?;
    repo.update_signup(id, &updates).map_err(|e| {
        log::error!("Failed to update signup {id}: {e}");
        ServiceError::from(e)
    })
}

pub fn delete_signup<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: SignupWriter + ?Sized,
{
    let id = signup_id(id)?;
    repo.delete_signup(id).map_err(|e| {
        log::error!("Failed to delete signup {id}: {e}");
        ServiceError::from(e)
    })
}
