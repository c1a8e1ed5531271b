#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use lent_campaign::db::{DbPool, establish_connection_pool};
use lent_campaign::domain::category::NewCategory;
use lent_campaign::domain::organization::NewOrganization;
use lent_campaign::domain::signup::{NewSignup, PledgeType};
use lent_campaign::domain::types::{
    Age, CategoryId, CategoryName, OrganizationName, OrganizationType, Participants, PersonName,
    PhoneNumber, Province,
};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// A migrated SQLite file in a temporary directory, removed on drop.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn day(month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, month, day)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn category(name: &str) -> NewCategory {
    NewCategory::new(CategoryName::new(name).unwrap())
}

pub fn signup(
    first_name: &str,
    province: Option<&str>,
    category_id: Option<CategoryId>,
    pledge_type: PledgeType,
    age: i32,
    created_at: NaiveDateTime,
) -> NewSignup {
    NewSignup::new(
        PersonName::new(first_name).unwrap(),
        PersonName::new("ทดสอบ").unwrap(),
        PhoneNumber::new("0812345678").unwrap(),
        province.map(|p| Province::new(p).unwrap()),
        category_id,
        pledge_type,
        Age::new(age).unwrap(),
    )
    .registered_at(created_at)
}

pub fn organization(
    name: &str,
    org_type: &str,
    province: Option<&str>,
    participants: i32,
    images: &[&str],
    created_at: NaiveDateTime,
) -> NewOrganization {
    NewOrganization::new(
        OrganizationName::new(name).unwrap(),
        None,
        OrganizationType::new(org_type).unwrap(),
        province.map(|p| Province::new(p).unwrap()),
        PersonName::new("ผู้ประสานงาน").unwrap(),
        PhoneNumber::new("021234567").unwrap(),
        Participants::new(participants).unwrap(),
        images.iter().map(|path| path.to_string()).collect(),
    )
    .registered_at(created_at)
}
