//! CSV export of filtered lists. The export uses the list's filter and
//! sort but ignores pagination.

use std::collections::HashMap;

use csv::Writer;

use crate::domain::organization::MAX_IMAGES;
use crate::domain::types::CategoryId;
use crate::query::{FilterCriteria, OrganizationListQuery, SignupListQuery};
use crate::repository::{CategoryReader, OrganizationReader, SignupReader};
use crate::services::{ServiceError, ServiceResult};

/// Lets spreadsheet applications detect UTF-8 for Thai text.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn category_names<R>(repo: &R) -> ServiceResult<HashMap<CategoryId, String>>
where
    R: CategoryReader + ?Sized,
{
    let categories = repo.list_categories()?;
    Ok(categories
        .into_iter()
        .map(|category| (category.id, category.name.into_inner()))
        .collect())
}

fn category_label(names: &HashMap<CategoryId, String>, id: Option<CategoryId>) -> String {
    id.and_then(|id| names.get(&id).cloned()).unwrap_or_default()
}

fn finish(writer: Writer<Vec<u8>>) -> ServiceResult<Vec<u8>> {
    let body = writer
        .into_inner()
        .map_err(|e| ServiceError::Internal(format!("Failed to flush csv: {e}")))?;

    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + body.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

fn csv_error(e: csv::Error) -> ServiceError {
    ServiceError::Internal(format!("Failed to write csv: {e}"))
}

/// Every signup matching `criteria` as CSV, header row first.
pub fn export_signups<R>(repo: &R, criteria: &FilterCriteria) -> ServiceResult<Vec<u8>>
where
    R: SignupReader + CategoryReader + ?Sized,
{
    let query = SignupListQuery::from_criteria(criteria).unpaginated();
    let (_total, signups) = repo.list_signups(&query).map_err(|e| {
        log::error!("Failed to export signups: {e}");
        ServiceError::from(e)
    })?;
    let names = category_names(repo)?;

    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record([
            "id",
            "first_name",
            "last_name",
            "phone",
            "province",
            "category",
            "pledge_type",
            "age",
            "created_at",
        ])
        .map_err(csv_error)?;

    for signup in &signups {
        writer
            .write_record([
                signup.id.to_string(),
                signup.first_name.to_string(),
                signup.last_name.to_string(),
                signup.phone.to_string(),
                signup.province.as_deref().unwrap_or_default().to_string(),
                category_label(&names, signup.category_id),
                signup.pledge_type.label().to_string(),
                signup.age.get().to_string(),
                signup.created_at.format(TIMESTAMP_FORMAT).to_string(),
            ])
            .map_err(csv_error)?;
    }

    finish(writer)
}

/// Every organization matching `criteria` as CSV, header row first.
pub fn export_organizations<R>(repo: &R, criteria: &FilterCriteria) -> ServiceResult<Vec<u8>>
where
    R: OrganizationReader + CategoryReader + ?Sized,
{
    let query = OrganizationListQuery::from_criteria(criteria).unpaginated();
    let (_total, organizations) = repo.list_organizations(&query).map_err(|e| {
        log::error!("Failed to export organizations: {e}");
        ServiceError::from(e)
    })?;
    let names = category_names(repo)?;

    let mut writer = Writer::from_writer(Vec::new());
    let mut header = vec![
        "id".to_string(),
        "name".to_string(),
        "org_type".to_string(),
        "province".to_string(),
        "category".to_string(),
        "contact_name".to_string(),
        "phone".to_string(),
        "participants".to_string(),
    ];
    header.extend((1..=MAX_IMAGES).map(|slot| format!("image_{slot}")));
    header.push("created_at".to_string());
    writer.write_record(&header).map_err(csv_error)?;

    for organization in &organizations {
        let mut record = vec![
            organization.id.to_string(),
            organization.name.to_string(),
            organization.org_type.to_string(),
            organization
                .province
                .as_deref()
                .unwrap_or_default()
                .to_string(),
            category_label(&names, organization.category_id),
            organization.contact_name.to_string(),
            organization.phone.to_string(),
            organization.participants.get().to_string(),
        ];
        record.extend(
            (0..MAX_IMAGES).map(|slot| organization.images.get(slot).cloned().unwrap_or_default()),
        );
        record.push(organization.created_at.format(TIMESTAMP_FORMAT).to_string());
        writer.write_record(&record).map_err(csv_error)?;
    }

    finish(writer)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::category::Category;
    use crate::domain::signup::{PledgeType, Signup};
    use crate::domain::types::{Age, CategoryName, PersonName, PhoneNumber, Province, SignupId};
    use crate::repository::mock::MockRepository;

    #[test]
    fn signups_export_ignores_pagination_and_labels_categories() {
        let at = NaiveDate::from_ymd_opt(2025, 7, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let signup = Signup {
            id: SignupId::new(1).unwrap(),
            first_name: PersonName::new("สมชาย").unwrap(),
            last_name: PersonName::new("ใจดี").unwrap(),
            phone: PhoneNumber::new("0812345678").unwrap(),
            province: Some(Province::new("ตาก").unwrap()),
            category_id: Some(CategoryId::new(2).unwrap()),
            pledge_type: PledgeType::Reduce,
            age: Age::new(40).unwrap(),
            created_at: at,
            updated_at: at,
        };

        let mut repo = MockRepository::new();
        repo.expect_list_signups()
            .withf(|query| query.pagination.is_none())
            .returning(move |_| Ok((1, vec![signup.clone()])));
        repo.expect_list_categories().returning(move || {
            Ok(vec![Category {
                id: CategoryId::new(2).unwrap(),
                name: CategoryName::new("ชุมชน").unwrap(),
                created_at: at,
            }])
        });

        let criteria = FilterCriteria {
            page: Some(3),
            ..Default::default()
        };
        let bytes = export_signups(&repo, &criteria).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id,first_name,last_name,phone,province,category,pledge_type,age,created_at"
        );
        assert_eq!(
            lines[1],
            "1,สมชาย,ใจดี,+66812345678,ตาก,ชุมชน,ลดการดื่ม,40,2025-07-10 08:30:00"
        );
        assert_eq!(lines.len(), 2);
    }
}
