//! `kardex-core` — shared foundation for the stock ledger.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the error taxonomy, and the optimistic
//! concurrency expectation used by the storage seams.

pub mod error;
pub mod id;
pub mod version;

pub use error::{InventoryError, InventoryResult};
pub use id::{MovementId, ProductId};
pub use version::ExpectedVersion;
