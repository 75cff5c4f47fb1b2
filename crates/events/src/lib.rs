//! Domain event abstractions: the `Event` contract and a pub/sub bus.
//!
//! Events are published *after* the corresponding write has committed, so the
//! bus is purely a distribution mechanism; the ledger remains the source of
//! truth. Delivery is at-least-once and subscribers must be idempotent.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
