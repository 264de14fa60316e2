//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a local, deterministic failure reported synchronously to
/// the caller. None of them are retryable and none leave partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced inventory key, or a hold on an existing key, does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The requested hold amount exceeds what is currently available.
    #[error("insufficient inventory: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u64 },

    /// A value failed validation (e.g. zero amount, malformed identifier).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A conflict occurred (e.g. provisioning a key twice).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn insufficient_stock(requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            requested,
            available,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(DomainError::not_found("item").to_string(), "item not found");
        assert_eq!(
            DomainError::insufficient_stock(80, 70).to_string(),
            "insufficient inventory: requested 80, available 70"
        );
    }
}
