//! Inventory service: the public API surface over catalog, ledger and
//! projector.
//!
//! This is the only layer with multi-component transactional scope. Movement
//! registration executes under a per-product exclusive section so the
//! validate/append/update-quantity triple is all-or-nothing with respect to
//! any observer, and domain events are published only after the write has
//! committed.

pub mod events;
pub mod locks;
pub mod service;
pub mod types;


pub use events::{
    InventoryEvent, MovementRegistered, ProductCreated, ProductDeactivated, ProductUpdated,
};
pub use service::InventoryService;
pub use types::{MovementReceipt, ProductSnapshot};
