//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database, mail).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// A caller-supplied argument broke a business rule
    #[error("{0}")]
    InvalidArgument(String),

    /// Password-related errors
    #[error("{0}")]
    Password(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        DomainError::InvalidArgument(msg.into())
    }

    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
