//! Diesel implementation of the signup reader and writer.

use std::collections::HashMap;

use diesel::dsl::{count_star, min, sum};
use diesel::sql_types::{BigInt, Bool, Nullable, Text, Timestamp};
use diesel::sqlite::Sqlite;
use diesel::{Connection, prelude::*};

use crate::aggregation::{Period, relabel};
use crate::db::unicode_lower;
use crate::domain::signup::{NewSignup, PledgeType, Signup, UpdateSignup};
use crate::domain::types::SignupId;
use crate::models::signup::{
    NewSignup as DbNewSignup, Signup as DbSignup, UpdateSignup as DbUpdateSignup,
};
use crate::query::{DateRange, Predicate, SignupListQuery, SignupSort, Sort, like_pattern};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, GroupCounts, PeriodCounts, SignupGroup, SignupReader, SignupWriter,
    first_seen,
};
use crate::schema::{categories, signups};

type BoxedSignups = signups::BoxedQuery<'static, Sqlite>;
type SearchCondition = Box<dyn BoxableExpression<signups::table, Sqlite, SqlType = Bool>>;

#[derive(QueryableByName)]
struct PeriodCount {
    #[diesel(sql_type = Text)]
    period: String,
    #[diesel(sql_type = BigInt)]
    count: i64,
}

const COUNT_PER_PERIOD: &str = "SELECT strftime(?, created_at) AS period, COUNT(*) AS count \
     FROM signups \
     WHERE (? IS NULL OR created_at >= ?) AND (? IS NULL OR created_at < ?) \
     GROUP BY period";

/// Case-insensitive substring match of one lower-cased needle against every
/// searchable column.
fn search_condition(needle: &str) -> SearchCondition {
    let pattern = like_pattern(needle);
    Box::new(
        unicode_lower(signups::first_name)
            .like(pattern.clone())
            .escape('\\')
            .or(unicode_lower(signups::last_name)
                .like(pattern.clone())
                .escape('\\'))
            .or(unicode_lower(signups::phone).like(pattern).escape('\\')),
    )
}

/// Translates the predicate into a boxed `WHERE` clause. Absent fields add
/// no condition.
fn filtered(predicate: &Predicate) -> BoxedSignups {
    let mut query = signups::table.into_boxed();

    let mut needles = predicate.search_needles().into_iter();
    if let Some(first) = needles.next() {
        let condition = needles.fold(search_condition(&first), |acc, needle| -> SearchCondition {
            Box::new(acc.or(search_condition(&needle)))
        });
        query = query.filter(condition);
    }
    if !predicate.provinces.is_empty() {
        query = query.filter(signups::province.eq_any(predicate.provinces.clone()));
    }
    if !predicate.category_ids.is_empty() {
        query = query.filter(signups::category_id.eq_any(predicate.category_ids.clone()));
    }
    if !predicate.kinds.is_empty() {
        query = query.filter(signups::pledge_type.eq_any(predicate.kinds.clone()));
    }
    if let Some(start) = predicate.created.start {
        query = query.filter(signups::created_at.ge(start));
    }
    if let Some(end) = predicate.created.end {
        query = query.filter(signups::created_at.lt(end));
    }
    if let Some(min) = predicate.amount.min {
        query = query.filter(signups::age.ge(min));
    }
    if let Some(max) = predicate.amount.max {
        query = query.filter(signups::age.le(max));
    }

    query
}

fn sorted(query: BoxedSignups, sort: Sort<SignupSort>) -> BoxedSignups {
    match sort.key {
        SignupSort::CreatedAt => {
            sort_boxed!(query, signups::created_at, signups::id, sort.direction)
        }
        SignupSort::FirstName => {
            sort_boxed!(query, signups::first_name, signups::id, sort.direction)
        }
        SignupSort::LastName => sort_boxed!(query, signups::last_name, signups::id, sort.direction),
        SignupSort::Province => sort_boxed!(query, signups::province, signups::id, sort.direction),
        SignupSort::Age => sort_boxed!(query, signups::age, signups::id, sort.direction),
    }
}

fn into_domain(rows: Vec<DbSignup>) -> RepositoryResult<Vec<Signup>> {
    rows.into_iter()
        .map(|row| Signup::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl SignupReader for DieselRepository {
    fn get_signup_by_id(&self, id: SignupId) -> RepositoryResult<Option<Signup>> {
        let mut conn = self.conn()?;
        let row = signups::table
            .find(id.get())
            .first::<DbSignup>(&mut conn)
            .optional()?;

        row.map(Signup::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_signups(&self, query: &SignupListQuery) -> RepositoryResult<(usize, Vec<Signup>)> {
        let mut conn = self.conn()?;

        // Count and page come from the same snapshot so the page always
        // agrees with the reported total.
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

            Ok((total, items.load::<DbSignup>(conn)?))
        })?;

        Ok((total, into_domain(rows)?))
    }

    fn count_signups(&self, predicate: &Predicate) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(predicate).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn count_signups_by(&self, group: SignupGroup) -> RepositoryResult<GroupCounts> {
        let mut conn = self.conn()?;

        let rows = match group {
            SignupGroup::Province => first_seen(
                signups::table
                    .group_by(signups::province)
                    .select((signups::province, count_star(), min(signups::id)))
                    .load::<(Option<String>, i64, Option<i32>)>(&mut conn)?,
            )
            .into_iter()
            .map(|(province, count)| (province, count as u64))
            .collect(),
            SignupGroup::PledgeType => first_seen(
                signups::table
                    .group_by(signups::pledge_type)
                    .select((signups::pledge_type, count_star(), min(signups::id)))
                    .load::<(String, i64, Option<i32>)>(&mut conn)?,
            )
            .into_iter()
            .map(|(code, count)| {
                let label = PledgeType::from(code).label().to_string();
                (Some(label), count as u64)
            })
            .collect(),
            SignupGroup::Category => {
                let counts = first_seen(
                    signups::table
                        .group_by(signups::category_id)
                        .select((signups::category_id, count_star(), min(signups::id)))
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

    fn count_signups_per_period(
        &self,
        period: Period,
        created: DateRange,
    ) -> RepositoryResult<PeriodCounts> {
        let mut conn = self.conn()?;
        let rows = diesel::sql_query(COUNT_PER_PERIOD)
            .bind::<Text, _>(period.pattern())
            .bind::<Nullable<Timestamp>, _>(created.start)
            .bind::<Nullable<Timestamp>, _>(created.start)
            .bind::<Nullable<Timestamp>, _>(created.end)
            .bind::<Nullable<Timestamp>, _>(created.end)
            .load::<PeriodCount>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.period, row.count as u64))
            .collect())
    }

    fn signup_age_totals(&self) -> RepositoryResult<(u64, i64)> {
        let mut conn = self.conn()?;
        let (count, total) = signups::table
            .select((count_star(), sum(signups::age)))
            .first::<(i64, Option<i64>)>(&mut conn)?;
        Ok((count as u64, total.unwrap_or(0)))
    }
}

impl SignupWriter for DieselRepository {
    fn create_signup(&self, new_signup: &NewSignup) -> RepositoryResult<Signup> {
        let mut conn = self.conn()?;
        let insertable: DbNewSignup = new_signup.into();

        let row = diesel::insert_into(signups::table)
            .values(&insertable)
            .get_result::<DbSignup>(&mut conn)?;

        Signup::try_from(row).map_err(RepositoryError::from)
    }

    fn update_signup(&self, id: SignupId, updates: &UpdateSignup) -> RepositoryResult<Signup> {
        let mut conn = self.conn()?;
        let changes: DbUpdateSignup = updates.into();

        let row = diesel::update(signups::table.find(id.get()))
            .set(&changes)
            .get_result::<DbSignup>(&mut conn)?;

        Signup::try_from(row).map_err(RepositoryError::from)
    }

    fn delete_signup(&self, id: SignupId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(signups::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
