use thiserror::Error;

use stockroom_core::{DomainError, ProductId};

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Failure reported by a [`RecordStore`](crate::RecordStore) backend.
///
/// These are infrastructure errors, as opposed to caller-input domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store's unique index on product id rejected a write.
    #[error("a record for product {0} already exists")]
    DuplicateProduct(ProductId),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Error returned by every inventory operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification used by transports to pick a status signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Unavailable,
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::Domain(DomainError::InvalidArgument(_)) => ErrorKind::InvalidArgument,
            InventoryError::Domain(DomainError::NotFound(_)) => ErrorKind::NotFound,
            InventoryError::Domain(DomainError::AlreadyExists(_)) => ErrorKind::AlreadyExists,
            InventoryError::Store(StoreError::DuplicateProduct(_)) => ErrorKind::AlreadyExists,
            InventoryError::Store(StoreError::Backend(_)) => ErrorKind::Unavailable,
        }
    }

    /// Domain errors carry a message safe to show callers; store errors don't.
    pub fn public_message(&self) -> String {
        match self {
            InventoryError::Domain(e) => e.message().to_string(),
            InventoryError::Store(StoreError::DuplicateProduct(p)) => {
                format!("inventory already exists for product {p}")
            }
            InventoryError::Store(StoreError::Backend(_)) => "storage unavailable".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_error_taxonomy() {
        let e: InventoryError = DomainError::invalid_argument("x").into();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        let e: InventoryError = DomainError::not_found("x").into();
        assert_eq!(e.kind(), ErrorKind::NotFound);
        let e: InventoryError = StoreError::DuplicateProduct(ProductId::new()).into();
        assert_eq!(e.kind(), ErrorKind::AlreadyExists);
        let e: InventoryError = StoreError::backend("connection reset").into();
        assert_eq!(e.kind(), ErrorKind::Unavailable);
        assert_eq!(e.public_message(), "storage unavailable");
    }
}
