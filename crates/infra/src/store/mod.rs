//! Storage traits and their in-memory implementations.

pub mod movement_store;
pub mod product_store;

pub use movement_store::{InMemoryMovementStore, MovementStore};
pub use product_store::{InMemoryProductStore, ProductStore};

use thiserror::Error;

use kardex_core::InventoryError;

/// Storage operation error.
///
/// Infrastructure taxonomy (concurrency, uniqueness, availability) as opposed
/// to domain errors; the service maps these into `InventoryError` at its
/// boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Optimistic concurrency check failed (stale version).
    #[error("concurrency check failed: {0}")]
    Concurrency(String),

    /// Another product already carries this sku.
    #[error("duplicate sku: {0}")]
    DuplicateSku(String),

    /// The referenced record does not exist.
    #[error("record not found")]
    NotFound,

    /// The store could not serve the request (lock poisoned, backend down).
    /// No partial effect; safe to retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for InventoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(msg) => InventoryError::Conflict(msg),
            StoreError::DuplicateSku(sku) => {
                InventoryError::validation(format!("sku already in use: {sku}"))
            }
            StoreError::NotFound => InventoryError::NotFound,
            StoreError::Unavailable(msg) => InventoryError::Transient(msg),
        }
    }
}
