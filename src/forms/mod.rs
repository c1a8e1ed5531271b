//! Form definitions backing the create and update endpoints.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::CategoryId;

pub mod category;
pub mod organization;
pub mod signup;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid category id")]
    InvalidCategory,

    #[error("invalid pledge type")]
    InvalidPledgeType,

    #[error("invalid organization type")]
    InvalidOrganizationType,

    #[error("value out of range")]
    OutOfRange,
}

/// Reads an optional category id from a form field. A blank field means
/// "no category".
pub(crate) fn optional_category(value: Option<&str>) -> Result<Option<CategoryId>, FormError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .ok()
            .and_then(|id| CategoryId::new(id).ok())
            .map(Some)
            .ok_or(FormError::InvalidCategory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_category_is_absent() {
        assert!(matches!(optional_category(None), Ok(None)));
        assert!(matches!(optional_category(Some("  ")), Ok(None)));
    }

    #[test]
    fn category_must_be_a_positive_number() {
        assert_eq!(
            optional_category(Some("3")).ok().flatten().map(CategoryId::get),
            Some(3)
        );
        assert!(matches!(
            optional_category(Some("0")),
            Err(FormError::InvalidCategory)
        ));
        assert!(matches!(
            optional_category(Some("abc")),
            Err(FormError::InvalidCategory)
        ));
    }
}
