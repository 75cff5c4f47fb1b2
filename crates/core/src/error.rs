//! Error taxonomy for the ledger core.

use thiserror::Error;

/// Result type used across the ledger core.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// A rejection of a single logical operation.
///
/// `Validation`, `NotFound` and `InsufficientStock` are deterministic domain
/// rejections and require caller correction; they are never retried. `Conflict`
/// and `Transient` come from the storage layer and may be retried (the service
/// retries them internally a bounded number of times before surfacing).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Malformed input (missing field, non-positive quantity, duplicate sku).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced product or movement does not exist (or is deactivated).
    #[error("not found")]
    NotFound,

    /// A salida would drive the product's quantity negative. Business-rule
    /// rejection, not a system fault; the operation has no side effects.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: u64, requested: u64 },

    /// Concurrent modification detected (stale version). Safe to retry the
    /// whole operation from scratch.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage/transport failure with no partial effect. Safe to retry with
    /// backoff.
    #[error("transient storage failure: {0}")]
    Transient(String),
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn insufficient_stock(available: u64, requested: u64) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Whether the caller may retry the operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Transient(_))
    }
}
