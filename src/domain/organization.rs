//! Organization submissions: schools, temples, agencies and communities
//! that join the campaign as a group.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, OrganizationId, OrganizationName, OrganizationType, Participants, PersonName,
    PhoneNumber, Province,
};
use crate::query::Filterable;

/// Number of activity photos an organization may attach.
pub const MAX_IMAGES: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: OrganizationName,
    pub category_id: Option<CategoryId>,
    pub org_type: OrganizationType,
    pub province: Option<Province>,
    pub contact_name: PersonName,
    pub phone: PhoneNumber,
    pub participants: Participants,
    /// Stored image paths, at most [`MAX_IMAGES`].
    pub images: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Organization {
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

impl Filterable for Organization {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.contact_name.as_str(),
            self.phone.as_str(),
        ]
    }

    fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    fn category_id(&self) -> Option<i32> {
        self.category_id.map(CategoryId::get)
    }

    fn kind(&self) -> String {
        self.org_type.to_string()
    }

    fn amount(&self) -> i32 {
        self.participants.get()
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

/// Keeps non-blank paths, trimmed, capped at [`MAX_IMAGES`].
pub fn normalize_images<I, S>(images: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    images
        .into_iter()
        .map(|path| path.as_ref().trim().to_string())
        .filter(|path| !path.is_empty())
        .take(MAX_IMAGES)
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOrganization {
    pub name: OrganizationName,
    pub category_id: Option<CategoryId>,
    pub org_type: OrganizationType,
    pub province: Option<Province>,
    pub contact_name: PersonName,
    pub phone: PhoneNumber,
    pub participants: Participants,
    pub images: Vec<String>,
    pub created_at: NaiveDateTime,
}

impl NewOrganization {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        name: OrganizationName,
        category_id: Option<CategoryId>,
        org_type: OrganizationType,
        province: Option<Province>,
        contact_name: PersonName,
        phone: PhoneNumber,
        participants: Participants,
        images: Vec<String>,
    ) -> Self {
        Self {
            name,
            category_id,
            org_type,
            province,
            contact_name,
            phone,
            participants,
            images: normalize_images(images),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn registered_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateOrganization {
    pub name: OrganizationName,
    pub category_id: Option<CategoryId>,
    pub org_type: OrganizationType,
    pub province: Option<Province>,
    pub contact_name: PersonName,
    pub phone: PhoneNumber,
    pub participants: Participants,
    pub images: Vec<String>,
    pub updated_at: NaiveDateTime,
}

impl From<NewOrganization> for UpdateOrganization {
    fn from(org: NewOrganization) -> Self {
        Self {
            name: org.name,
            category_id: org.category_id,
            org_type: org.org_type,
            province: org.province,
            contact_name: org.contact_name,
            phone: org.phone,
            participants: org.participants,
            images: org.images,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_are_trimmed_and_capped() {
        let images = normalize_images(["a.jpg", " ", " b.jpg ", "c.jpg", "d.jpg", "e.jpg"]);
        assert_eq!(images, vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    }
}
