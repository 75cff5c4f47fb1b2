//! Movement ledger domain module.
//!
//! The ledger is the append-only authority for "what happened" to stock.
//! Records are write-once: there are no update or delete operations anywhere
//! in this crate or in the stores that persist its types.

pub mod movement;

pub use movement::{MovementDraft, MovementKind, StockMovement};
