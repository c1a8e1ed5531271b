//! DTO modules that bridge services with the JSON API.

pub mod dashboard;
pub mod list;

use serde::Serialize;

/// Error payload returned by every endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    /// Whether repeating the request later may succeed.
    pub retry: bool,
}
