use serde::Deserialize;
use validator::Validate;

use crate::domain::organization::{NewOrganization, UpdateOrganization};
use crate::domain::types::{
    OrganizationName, OrganizationType, Participants, PersonName, PhoneNumber, optional_province,
};
use crate::forms::{FormError, optional_category};

#[derive(Debug, Deserialize, Validate)]
/// Form data for an organization submission.
pub struct OrganizationForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub org_type: String,
    #[serde(default)]
    pub province: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub contact_name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(range(min = 0))]
    pub participants: i32,
    /// Stored image paths; blanks are dropped.
    #[serde(default)]
    pub image_1: Option<String>,
    #[serde(default)]
    pub image_2: Option<String>,
    #[serde(default)]
    pub image_3: Option<String>,
    #[serde(default)]
    pub image_4: Option<String>,
}

impl TryFrom<OrganizationForm> for NewOrganization {
    type Error = FormError;

    fn try_from(form: OrganizationForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let name = OrganizationName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let org_type = OrganizationType::new(form.org_type)
            .map_err(|_| FormError::InvalidOrganizationType)?;
        let contact_name =
            PersonName::new(form.contact_name).map_err(|_| FormError::InvalidName)?;
        let phone = PhoneNumber::new(form.phone).map_err(|_| FormError::InvalidPhoneNumber)?;
        let participants =
            Participants::new(form.participants).map_err(|_| FormError::OutOfRange)?;
        let category_id = optional_category(form.category_id.as_deref())?;

        let images = [form.image_1, form.image_2, form.image_3, form.image_4]
            .into_iter()
            .flatten()
            .collect();

        Ok(NewOrganization::new(
            name,
            category_id,
            org_type,
            optional_province(form.province),
            contact_name,
            phone,
            participants,
            images,
        ))
    }
}

impl TryFrom<OrganizationForm> for UpdateOrganization {
    type Error = FormError;

    fn try_from(form: OrganizationForm) -> Result<Self, Self::Error> {
        NewOrganization::try_from(form).map(UpdateOrganization::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> OrganizationForm {
        OrganizationForm {
            name: "โรงเรียนบ้านหนองบัว".to_string(),
            category_id: None,
            org_type: "school".to_string(),
            province: Some("ขอนแก่น".to_string()),
            contact_name: "ครูสมศรี".to_string(),
            phone: "043 123 456".to_string(),
            participants: 120,
            image_1: Some("/uploads/a.jpg".to_string()),
            image_2: Some(" ".to_string()),
            image_3: None,
            image_4: Some("/uploads/d.jpg".to_string()),
        }
    }

    #[test]
    fn blank_images_are_dropped() {
        let org = NewOrganization::try_from(form()).unwrap();
        assert_eq!(org.images, vec!["/uploads/a.jpg", "/uploads/d.jpg"]);
        assert_eq!(org.participants.get(), 120);
    }

    #[test]
    fn negative_participants_fail_validation() {
        let result = NewOrganization::try_from(OrganizationForm {
            participants: -5,
            ..form()
        });
        assert!(matches!(result, Err(FormError::Validation(_))));
    }

    #[test]
    fn blank_org_type_is_rejected() {
        let result = NewOrganization::try_from(OrganizationForm {
            org_type: "  ".to_string(),
            ..form()
        });
        assert!(matches!(result, Err(FormError::InvalidOrganizationType)));
    }
}
