use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kardex_core::{InventoryError, InventoryResult, MovementId, ProductId};

/// Direction of a stock movement.
///
/// The sign is implied by the kind; `quantity` on a movement is always the
/// unsigned magnitude. Serialized lowercase ("entrada"/"salida"), matching the
/// historical wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Goods received (positive delta).
    Entrada,
    /// Goods issued/sold/removed (negative delta).
    Salida,
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MovementKind::Entrada => f.write_str("entrada"),
            MovementKind::Salida => f.write_str("salida"),
        }
    }
}

/// A validated, not-yet-appended movement.
///
/// Quantity is strictly positive; the note is trimmed and blank notes are
/// dropped. Id, sequence and timestamp are assigned by the store at append
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub kind: MovementKind,
    pub quantity: u64,
    pub note: Option<String>,
}

impl MovementDraft {
    pub fn new(kind: MovementKind, quantity: u64, note: Option<String>) -> InventoryResult<Self> {
        if quantity == 0 {
            return Err(InventoryError::validation(
                "movement quantity must be strictly positive",
            ));
        }
        let note = note.and_then(|n| {
            let trimmed = n.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        Ok(Self {
            kind,
            quantity,
            note,
        })
    }
}

/// An immutable, committed ledger record.
///
/// Once appended, a movement is never mutated or deleted; it remains queryable
/// even after its product has been deactivated (audit trail).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub kind: MovementKind,
    /// Unsigned magnitude; the sign comes from `kind`.
    pub quantity: u64,
    pub note: Option<String>,
    /// Assigned by the store at insert time.
    pub occurred_at: DateTime<Utc>,
    /// Monotonically increasing position in the product's stream (starts at 1).
    pub sequence: u64,
}

impl StockMovement {
    /// The movement's effect on stock quantity as a signed delta.
    ///
    /// Returns `i128` so the full `u64` quantity range negates without
    /// wrapping.
    pub fn signed_delta(&self) -> i128 {
        match self.kind {
            MovementKind::Entrada => self.quantity as i128,
            MovementKind::Salida => -(self.quantity as i128),
        }
    }
}
