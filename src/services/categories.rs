use crate::domain::category::{Category, NewCategory};
use crate::domain::types::CategoryId;
use crate::forms::category::CategoryForm;
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

fn category_id(raw: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(raw).map_err(|_| ServiceError::NotFound)
}

/// All categories, by name.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::from(e)
    })
}

pub fn create_category<R>(repo: &R, form: CategoryForm) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let new_category = NewCategory::try_from(form)?;
    repo.create_category(&new_category).map_err(|e| {
        log::error!("Failed to create category: {e}");
        ServiceError::from(e)
    })
}

pub fn rename_category<R>(repo: &R, id: i32, form: CategoryForm) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let id = category_id(id)?;
    let updates = NewCategory::try_from(form)?;
    repo.update_category(id, &updates).map_err(|e| {
        log::error!("Failed to rename category {id}: {e}");
        ServiceError::from(e)
    })
}

/// Deletes a category. Signups and organizations that referenced it are
/// kept without a category.
pub fn delete_category<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    let id = category_id(id)?;
    repo.delete_category(id).map_err(|e| {
        log::error!("Failed to delete category {id}: {e}");
        ServiceError::from(e)
    })
}
