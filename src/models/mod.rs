//! Database models shared across the campaign repository.

pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod organization;
pub mod signup;
