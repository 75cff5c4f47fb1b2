//! Domain events published after each committed operation.
//!
//! Published at-least-once, after the corresponding write has landed in the
//! stores. Callers that miss a publication can always re-read the catalog or
//! replay the ledger; the events exist so collaborators do not have to poll.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kardex_core::ProductId;
use kardex_events::Event;
use kardex_ledger::StockMovement;

/// Event: a product was created in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub product_id: ProductId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a product's mutable fields were edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdated {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a product was tombstoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDeactivated {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a movement was appended and the derived quantity updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRegistered {
    pub movement: StockMovement,
    pub new_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ProductCreated(ProductCreated),
    ProductUpdated(ProductUpdated),
    ProductDeactivated(ProductDeactivated),
    MovementRegistered(MovementRegistered),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ProductCreated(_) => "catalog.product.created",
            InventoryEvent::ProductUpdated(_) => "catalog.product.updated",
            InventoryEvent::ProductDeactivated(_) => "catalog.product.deactivated",
            InventoryEvent::MovementRegistered(_) => "ledger.movement.registered",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ProductCreated(e) => e.occurred_at,
            InventoryEvent::ProductUpdated(e) => e.occurred_at,
            InventoryEvent::ProductDeactivated(e) => e.occurred_at,
            InventoryEvent::MovementRegistered(e) => e.movement.occurred_at,
        }
    }
}
