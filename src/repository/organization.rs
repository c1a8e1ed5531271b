//! Diesel implementation of the organization reader and writer.

use std::collections::HashMap;

use diesel::dsl::{count_star, min, sum};
use diesel::sql_types::{BigInt, Bool, Integer};
use diesel::sqlite::Sqlite;
use diesel::{Connection, prelude::*};

use crate::aggregation::relabel;
use crate::db::unicode_lower;
use crate::domain::organization::{NewOrganization, Organization, UpdateOrganization};
use crate::domain::types::OrganizationId;
use crate::models::organization::{
    NewOrganization as DbNewOrganization, Organization as DbOrganization,
    UpdateOrganization as DbUpdateOrganization,
};
use crate::query::{OrganizationListQuery, OrganizationSort, Predicate, Sort, like_pattern};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, GroupCounts, OrganizationGroup, OrganizationReader, OrganizationWriter,
    first_seen,
};
use crate::schema::{categories, organizations};

type BoxedOrganizations = organizations::BoxedQuery<'static, Sqlite>;
type SearchCondition = Box<dyn BoxableExpression<organizations::table, Sqlite, SqlType = Bool>>;

#[derive(QueryableByName)]
struct ImageTally {
    #[diesel(sql_type = Integer)]
    images: i32,
    #[diesel(sql_type = BigInt)]
    count: i64,
}

const COUNT_BY_IMAGES: &str = "SELECT images, COUNT(*) AS count FROM (\
     SELECT (CASE WHEN trim(image_1) <> '' THEN 1 ELSE 0 END) \
          + (CASE WHEN trim(image_2) <> '' THEN 1 ELSE 0 END) \
          + (CASE WHEN trim(image_3) <> '' THEN 1 ELSE 0 END) \
          + (CASE WHEN trim(image_4) <> '' THEN 1 ELSE 0 END) AS images \
     FROM organizations) \
     GROUP BY images";

fn search_condition(needle: &str) -> SearchCondition {
    let pattern = like_pattern(needle);
    Box::new(
        unicode_lower(organizations::name)
            .like(pattern.clone())
            .escape('\\')
            .or(unicode_lower(organizations::contact_name)
                .like(pattern.clone())
                .escape('\\'))
            .or(unicode_lower(organizations::phone)
                .like(pattern)
                .escape('\\')),
    )
}

fn filtered(predicate: &Predicate) -> BoxedOrganizations {
    let mut query = organizations::table.into_boxed();

    let mut needles = predicate.search_needles().into_iter();
    if let Some(first) = needles.next() {
        let condition = needles.fold(search_condition(&first), |acc, needle| -> SearchCondition {
            Box::new(acc.or(search_condition(&needle)))
        });
        query = query.filter(condition);
    }
    if !predicate.provinces.is_empty() {
        query = query.filter(organizations::province.eq_any(predicate.provinces.clone()));
    }
    if !predicate.category_ids.is_empty() {
        query = query.filter(organizations::category_id.eq_any(predicate.category_ids.clone()));
    }
    if !predicate.kinds.is_empty() {
        query = query.filter(organizations::org_type.eq_any(predicate.kinds.clone()));
    }
    if let Some(start) = predicate.created.start {
        query = query.filter(organizations::created_at.ge(start));
    }
    if let Some(end) = predicate.created.end {
        query = query.filter(organizations::created_at.lt(end));
    }
    if let Some(min) = predicate.amount.min {
        query = query.filter(organizations::participants.ge(min));
    }
    if let Some(max) = predicate.amount.max {
        query = query.filter(organizations::participants.le(max));
    }

    query
}

fn sorted(query: BoxedOrganizations, sort: Sort<OrganizationSort>) -> BoxedOrganizations {
    let id = organizations::id;
    match sort.key {
        OrganizationSort::CreatedAt => {
            sort_boxed!(query, organizations::created_at, id, sort.direction)
        }
        OrganizationSort::Name => sort_boxed!(query, organizations::name, id, sort.direction),
        OrganizationSort::Province => {
            sort_boxed!(query, organizations::province, id, sort.direction)
        }
        OrganizationSort::Participants => {
            sort_boxed!(query, organizations::participants, id, sort.direction)
        }
    }
}

fn into_domain(rows: Vec<DbOrganization>) -> RepositoryResult<Vec<Organization>> {
    rows.into_iter()
        .map(|row| Organization::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl OrganizationReader for DieselRepository {
    fn get_organization_by_id(
        &self,
        id: OrganizationId,
    ) -> RepositoryResult<Option<Organization>> {
        let mut conn = self.conn()?;
        let row = organizations::table
            .find(id.get())
            .first::<DbOrganization>(&mut conn)
            .optional()?;

        row.map(Organization::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_organizations(
        &self,
        query: &OrganizationListQuery,
    ) -> RepositoryResult<(usize, Vec<Organization>)> {
        let mut conn = self.conn()?;

        let (total, rows) = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let total = filtered(&query.predicate)
                .count()
                .get_result::<i64>(conn)? as usize;

            let mut items = sorted(filtered(&query.predicate), query.sort);
            if let Some(pagination) = &query.pagination {
                let window = pagination.window(total);
                items = items
                    .offset(window.skip as i64)
                    .limit(window.per_page as i64);
            }

            Ok((total, items.load::<DbOrganization>(conn)?))
        })?;

        Ok((total, into_domain(rows)?))
    }

    fn count_organizations_by(&self, group: OrganizationGroup) -> RepositoryResult<GroupCounts> {
        let mut conn = self.conn()?;

        let rows = match group {
            OrganizationGroup::Province => first_seen(
                organizations::table
                    .group_by(organizations::province)
                    .select((organizations::province, count_star(), min(organizations::id)))
                    .load::<(Option<String>, i64, Option<i32>)>(&mut conn)?,
            )
            .into_iter()
            .map(|(province, count)| (province, count as u64))
            .collect(),
            OrganizationGroup::OrganizationType => first_seen(
                organizations::table
                    .group_by(organizations::org_type)
                    .select((organizations::org_type, count_star(), min(organizations::id)))
                    .load::<(String, i64, Option<i32>)>(&mut conn)?,
            )
            .into_iter()
            .map(|(org_type, count)| (Some(org_type), count as u64))
            .collect(),
            OrganizationGroup::Category => {
                let counts = first_seen(
                    organizations::table
                        .group_by(organizations::category_id)
                        .select((
                            organizations::category_id,
                            count_star(),
                            min(organizations::id),
                        ))
                        .load::<(Option<i32>, i64, Option<i32>)>(&mut conn)?,
                );
                let names: HashMap<i32, String> = categories::table
                    .select((categories::id, categories::name))
                    .load::<(i32, String)>(&mut conn)?
                    .into_iter()
                    .collect();

                relabel(
                    counts
                        .into_iter()
                        .map(|(category_id, count)| (category_id, count as u64)),
                    &names,
                )
            }
        };

        Ok(rows)
    }

    fn sum_participants_by_province(&self) -> RepositoryResult<Vec<(Option<String>, i64)>> {
        let mut conn = self.conn()?;
        let rows = first_seen(
            organizations::table
                .group_by(organizations::province)
                .select((
                    organizations::province,
                    sum(organizations::participants),
                    min(organizations::id),
                ))
                .load::<(Option<String>, Option<i64>, Option<i32>)>(&mut conn)?,
        );

        Ok(rows
            .into_iter()
            .map(|(province, total)| (province, total.unwrap_or(0)))
            .collect())
    }

    fn count_organizations_by_images(&self) -> RepositoryResult<Vec<(usize, u64)>> {
        let mut conn = self.conn()?;
        let rows = diesel::sql_query(COUNT_BY_IMAGES).load::<ImageTally>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.images.max(0) as usize, row.count as u64))
            .collect())
    }
}

impl OrganizationWriter for DieselRepository {
    fn create_organization(
        &self,
        new_organization: &NewOrganization,
    ) -> RepositoryResult<Organization> {
        let mut conn = self.conn()?;
        let insertable: DbNewOrganization = new_organization.into();

        let row = diesel::insert_into(organizations::table)
            .values(&insertable)
            .get_result::<DbOrganization>(&mut conn)?;

        Organization::try_from(row).map_err(RepositoryError::from)
    }

    fn update_organization(
        &self,
        id: OrganizationId,
        updates: &UpdateOrganization,
    ) -> RepositoryResult<Organization> {
        let mut conn = self.conn()?;
        let changes: DbUpdateOrganization = updates.into();

        let row = diesel::update(organizations::table.find(id.get()))
            .set(&changes)
            .get_result::<DbOrganization>(&mut conn)?;

        Organization::try_from(row).map_err(RepositoryError::from)
    }

    fn delete_organization(&self, id: OrganizationId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(organizations::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
