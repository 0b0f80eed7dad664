//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a caller-input failure: none is retried and none is fatal
/// to the process. Storage failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request was well-formed but breaks a business rule or precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource being created already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(m) | Self::NotFound(m) | Self::AlreadyExists(m) => m,
        }
    }
}
