//! Business operations behind the HTTP routes. Every function is generic
//! over the repository traits it needs so it can run against the mock.

use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod categories;
pub mod dashboard;
pub mod export;
pub mod organizations;
pub mod signups;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Whether repeating the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Repository(err) => err.is_transient(),
            ServiceError::Internal(_) => true,
            _ => false,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_becomes_service_not_found() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        let down = ServiceError::from(RepositoryError::ConnectionError("pool".into()));
        assert!(down.is_retryable());
        let conflict = ServiceError::from(RepositoryError::ConstraintViolation("name".into()));
        assert!(!conflict.is_retryable());
        assert!(!ServiceError::Form("bad".into()).is_retryable());
    }
}
