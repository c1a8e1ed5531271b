//! Individual pledge registrations.

use std::fmt::Display;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    Age, CategoryId, PersonName, PhoneNumber, Province, SignupId,
};
use crate::query::Filterable;

/// Commitment a participant makes for the Lent period.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PledgeType {
    /// Abstain for the whole three months of Lent.
    FullLent,
    OneMonth,
    OneWeek,
    /// Cut down rather than abstain.
    Reduce,
    Other(String),
}

impl PledgeType {
    /// Thai label shown on dashboards.
    pub fn label(&self) -> &str {
        match self {
            PledgeType::FullLent => "งดตลอดพรรษา",
            PledgeType::OneMonth => "งด 1 เดือน",
            PledgeType::OneWeek => "งด 1 สัปดาห์",
            PledgeType::Reduce => "ลดการดื่ม",
            PledgeType::Other(s) => s,
        }
    }
}

impl Display for PledgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PledgeType::FullLent => write!(f, "FullLent"),
            PledgeType::OneMonth => write!(f, "OneMonth"),
            PledgeType::OneWeek => write!(f, "OneWeek"),
            PledgeType::Reduce => write!(f, "Reduce"),
            PledgeType::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for PledgeType {
    fn from(s: &str) -> Self {
        match s {
            "FullLent" => PledgeType::FullLent,
            "OneMonth" => PledgeType::OneMonth,
            "OneWeek" => PledgeType::OneWeek,
            "Reduce" => PledgeType::Reduce,
            _ => PledgeType::Other(s.to_string()),
        }
    }
}

impl From<String> for PledgeType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Signup {
    pub id: SignupId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: PhoneNumber,
    pub province: Option<Province>,
    pub category_id: Option<CategoryId>,
    pub pledge_type: PledgeType,
    pub age: Age,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Signup {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Filterable for Signup {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
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
        self.pledge_type.to_string()
    }

    fn amount(&self) -> i32 {
        self.age.get()
    }

    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewSignup {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: PhoneNumber,
    pub province: Option<Province>,
    pub category_id: Option<CategoryId>,
    pub pledge_type: PledgeType,
    pub age: Age,
    pub created_at: NaiveDateTime,
}

impl NewSignup {
    #[must_use]
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        phone: PhoneNumber,
        province: Option<Province>,
        category_id: Option<CategoryId>,
        pledge_type: PledgeType,
        age: Age,
    ) -> Self {
        Self {
            first_name,
            last_name,
            phone,
            province,
            category_id,
            pledge_type,
            age,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Overrides the registration time, e.g. for bulk imports of paper forms.
    #[must_use]
    pub fn registered_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateSignup {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub phone: PhoneNumber,
    pub province: Option<Province>,
    pub category_id: Option<CategoryId>,
    pub pledge_type: PledgeType,
    pub age: Age,
    pub updated_at: NaiveDateTime,
}

impl From<NewSignup> for UpdateSignup {
    fn from(signup: NewSignup) -> Self {
        Self {
            first_name: signup.first_name,
            last_name: signup.last_name,
            phone: signup.phone,
            province: signup.province,
            category_id: signup.category_id,
            pledge_type: signup.pledge_type,
            age: signup.age,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pledge_type_round_trips_through_text() {
        for pledge in [
            PledgeType::FullLent,
            PledgeType::OneMonth,
            PledgeType::OneWeek,
            PledgeType::Reduce,
        ] {
            assert_eq!(PledgeType::from(pledge.to_string()), pledge);
        }
        assert_eq!(
            PledgeType::from("Custom"),
            PledgeType::Other("Custom".to_string())
        );
        assert_eq!(PledgeType::Other("เลิกถาวร".into()).label(), "เลิกถาวร");
    }
}
