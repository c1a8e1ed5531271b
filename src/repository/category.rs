use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};
use crate::schema::categories;

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        let mut conn = self.conn()?;
        let row = categories::table
            .find(id.get())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        row.map(Category::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let mut conn = self.conn()?;
        let rows = categories::table
            .order(categories::name.asc())
            .load::<DbCategory>(&mut conn)?;

        rows.into_iter()
            .map(|row| Category::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category> {
        let mut conn = self.conn()?;
        let insertable: DbNewCategory = new_category.into();

        let row = diesel::insert_into(categories::table)
            .values(&insertable)
            .get_result::<DbCategory>(&mut conn)?;

        Category::try_from(row).map_err(RepositoryError::from)
    }

    fn update_category(
        &self,
        id: CategoryId,
        updates: &NewCategory,
    ) -> RepositoryResult<Category> {
        let mut conn = self.conn()?;
        let changes: DbNewCategory = updates.into();

        let row = diesel::update(categories::table.find(id.get()))
            .set(&changes)
            .get_result::<DbCategory>(&mut conn)?;

        Category::try_from(row).map_err(RepositoryError::from)
    }

    /// Rows referencing the category keep existing with a NULL category.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(categories::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
