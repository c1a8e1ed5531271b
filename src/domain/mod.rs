//! Domain aggregates exposed by the campaign service layer.

pub mod category;
pub mod organization;
pub mod signup;
pub mod types;
