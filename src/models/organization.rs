//! Diesel models for organization submissions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::organization::{
    NewOrganization as DomainNewOrganization, Organization as DomainOrganization,
    UpdateOrganization as DomainUpdateOrganization, normalize_images,
};
use crate::domain::types::{
    CategoryId, OrganizationId, OrganizationName, OrganizationType, Participants, PersonName,
    PhoneNumber, TypeConstraintError, optional_province,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::organizations)]
/// Diesel model for [`crate::domain::organization::Organization`].
pub struct Organization {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub org_type: String,
    pub province: Option<String>,
    pub contact_name: String,
    pub phone: String,
    pub participants: i32,
    pub image_1: Option<String>,
    pub image_2: Option<String>,
    pub image_3: Option<String>,
    pub image_4: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Spreads up to four image paths over the fixed image columns.
fn image_slots(images: &[String]) -> [Option<&str>; 4] {
    let mut slots = [None; 4];
    for (slot, image) in slots.iter_mut().zip(images) {
        *slot = Some(image.as_str());
    }
    slots
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::organizations)]
/// Insertable form of [`Organization`].
pub struct NewOrganization<'a> {
    pub name: &'a str,
    pub category_id: Option<i32>,
    pub org_type: &'a str,
    pub province: Option<&'a str>,
    pub contact_name: &'a str,
    pub phone: &'a str,
    pub participants: i32,
    pub image_1: Option<&'a str>,
    pub image_2: Option<&'a str>,
    pub image_3: Option<&'a str>,
    pub image_4: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::organizations)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating an [`Organization`] record.
pub struct UpdateOrganization<'a> {
    pub name: &'a str,
    pub category_id: Option<i32>,
    pub org_type: &'a str,
    pub province: Option<&'a str>,
    pub contact_name: &'a str,
    pub phone: &'a str,
    pub participants: i32,
    pub image_1: Option<&'a str>,
    pub image_2: Option<&'a str>,
    pub image_3: Option<&'a str>,
    pub image_4: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Organization> for DomainOrganization {
    type Error = TypeConstraintError;

    fn try_from(org: Organization) -> Result<Self, Self::Error> {
        let images = normalize_images(
            [org.image_1, org.image_2, org.image_3, org.image_4]
                .into_iter()
                .flatten(),
        );

        Ok(Self {
            id: OrganizationId::try_from(org.id)?,
            name: OrganizationName::new(org.name)?,
            category_id: org.category_id.map(CategoryId::try_from).transpose()?,
            org_type: OrganizationType::new(org.org_type)?,
            province: optional_province(org.province),
            contact_name: PersonName::new(org.contact_name)?,
            phone: PhoneNumber::new(org.phone)?,
            participants: Participants::new(org.participants)?,
            images,
            created_at: org.created_at,
            updated_at: org.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewOrganization> for NewOrganization<'a> {
    fn from(org: &'a DomainNewOrganization) -> Self {
        let [image_1, image_2, image_3, image_4] = image_slots(&org.images);
        Self {
            name: org.name.as_str(),
            category_id: org.category_id.map(CategoryId::get),
            org_type: org.org_type.as_str(),
            province: org.province.as_deref(),
            contact_name: org.contact_name.as_str(),
            phone: org.phone.as_str(),
            participants: org.participants.get(),
            image_1,
            image_2,
            image_3,
            image_4,
            created_at: org.created_at,
            updated_at: org.created_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateOrganization> for UpdateOrganization<'a> {
    fn from(org: &'a DomainUpdateOrganization) -> Self {
        let [image_1, image_2, image_3, image_4] = image_slots(&org.images);
        Self {
            name: org.name.as_str(),
            category_id: org.category_id.map(CategoryId::get),
            org_type: org.org_type.as_str(),
            province: org.province.as_deref(),
            contact_name: org.contact_name.as_str(),
            phone: org.phone.as_str(),
            participants: org.participants.get(),
            image_1,
            image_2,
            image_3,
            image_4,
            updated_at: org.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn gaps_in_image_columns_are_compacted() {
        let now = Utc::now().naive_utc();
        let row = Organization {
            id: 1,
            name: "วัดป่า".to_string(),
            category_id: None,
            org_type: "temple".to_string(),
            province: Some("ตาก".to_string()),
            contact_name: "พระครู".to_string(),
            phone: "055123456".to_string(),
            participants: 120,
            image_1: None,
            image_2: Some("b.jpg".to_string()),
            image_3: Some(" ".to_string()),
            image_4: Some("d.jpg".to_string()),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainOrganization::try_from(row).unwrap();
        assert_eq!(domain.images, vec!["b.jpg", "d.jpg"]);
        assert_eq!(domain.image_count(), 2);
    }

    #[test]
    fn image_slots_fill_in_order() {
        let images = vec!["a".to_string(), "b".to_string()];
        assert_eq!(image_slots(&images), [Some("a"), Some("b"), None, None]);
    }
}
