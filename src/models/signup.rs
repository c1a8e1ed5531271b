//! Diesel models for pledge signups.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::signup::{
    NewSignup as DomainNewSignup, Signup as DomainSignup, UpdateSignup as DomainUpdateSignup,
};
use crate::domain::types::{
    Age, CategoryId, PersonName, PhoneNumber, SignupId, TypeConstraintError, optional_province,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::signups)]
/// Diesel model for [`crate::domain::signup::Signup`].
pub struct Signup {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub province: Option<String>,
    pub category_id: Option<i32>,
    pub pledge_type: String,
    pub age: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::signups)]
/// Insertable form of [`Signup`].
pub struct NewSignup<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub province: Option<&'a str>,
    pub category_id: Option<i32>,
    pub pledge_type: String,
    pub age: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::signups)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Signup`] record.
pub struct UpdateSignup<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub province: Option<&'a str>,
    pub category_id: Option<i32>,
    pub pledge_type: String,
    pub age: i32,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Signup> for DomainSignup {
    type Error = TypeConstraintError;

    fn try_from(signup: Signup) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SignupId::try_from(signup.id)?,
            first_name: PersonName::new(signup.first_name)?,
            last_name: PersonName::new(signup.last_name)?,
            phone: PhoneNumber::new(signup.phone)?,
            province: optional_province(signup.province),
            category_id: signup.category_id.map(CategoryId::try_from).transpose()?,
            pledge_type: signup.pledge_type.into(),
            age: Age::new(signup.age)?,
            created_at: signup.created_at,
            updated_at: signup.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewSignup> for NewSignup<'a> {
    fn from(signup: &'a DomainNewSignup) -> Self {
        Self {
            first_name: signup.first_name.as_str(),
            last_name: signup.last_name.as_str(),
            phone: signup.phone.as_str(),
            province: signup.province.as_deref(),
            category_id: signup.category_id.map(CategoryId::get),
            pledge_type: signup.pledge_type.to_string(),
            age: signup.age.get(),
            created_at: signup.created_at,
            updated_at: signup.created_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateSignup> for UpdateSignup<'a> {
    fn from(signup: &'a DomainUpdateSignup) -> Self {
        Self {
            first_name: signup.first_name.as_str(),
            last_name: signup.last_name.as_str(),
            phone: signup.phone.as_str(),
            province: signup.province.as_deref(),
            category_id: signup.category_id.map(CategoryId::get),
            pledge_type: signup.pledge_type.to_string(),
            age: signup.age.get(),
            updated_at: signup.updated_at,
        }
    }
}
