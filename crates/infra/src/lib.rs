//! Infrastructure layer: storage seams for the catalog and the ledger.
//!
//! Storage is abstracted behind traits so the in-memory implementations used
//! in tests/dev can later be swapped for durable backends without touching
//! domain or service code.

pub mod store;

pub use store::{
    InMemoryMovementStore, InMemoryProductStore, MovementStore, ProductStore, StoreError,
};
