use serde::Deserialize;
use validator::Validate;

use crate::domain::category::NewCategory;
use crate::domain::types::CategoryName;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for creating or renaming a category.
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl TryFrom<CategoryForm> for NewCategory {
    type Error = FormError;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let name = CategoryName::new(form.name).map_err(|_| FormError::InvalidName)?;
        Ok(NewCategory::new(name))
    }
}
