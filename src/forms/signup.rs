use serde::Deserialize;
use validator::Validate;

use crate::domain::signup::{NewSignup, PledgeType, UpdateSignup};
use crate::domain::types::{Age, PersonName, PhoneNumber, optional_province};
use crate::forms::{FormError, optional_category};

#[derive(Debug, Deserialize, Validate)]
/// Form data for registering or editing a pledge signup.
pub struct SignupForm {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[serde(default)]
    pub province: Option<String>,
    /// Category id as text; blank means none.
    #[serde(default)]
    pub category_id: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub pledge_type: String,
    #[validate(range(min = 1, max = 120))]
    pub age: i32,
}

impl TryFrom<SignupForm> for NewSignup {
    type Error = FormError;

    fn try_from(form: SignupForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let first_name = PersonName::new(form.first_name).map_err(|_| FormError::InvalidName)?;
        let last_name = PersonName::new(form.last_name).map_err(|_| FormError::InvalidName)?;
        let phone = PhoneNumber::new(form.phone).map_err(|_| FormError::InvalidPhoneNumber)?;
        let category_id = optional_category(form.category_id.as_deref())?;

        let pledge_type = form.pledge_type.trim();
        if pledge_type.is_empty() {
            return Err(FormError::InvalidPledgeType);
        }

        let age = Age::new(form.age).map_err(|_| FormError::OutOfRange)?;

        Ok(NewSignup::new(
            first_name,
            last_name,
            phone,
            optional_province(form.province),
            category_id,
            PledgeType::from(pledge_type),
            age,
        ))
    }
}

impl TryFrom<SignupForm> for UpdateSignup {
    type Error = FormError;

    fn try_from(form: SignupForm) -> Result<Self, Self::Error> {
        NewSignup::try_from(form).map(UpdateSignup::from)
    }
}
