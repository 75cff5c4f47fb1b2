use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use kardex_core::{ExpectedVersion, MovementId, ProductId};
use kardex_ledger::{MovementDraft, StockMovement};

use super::StoreError;

/// Append-only storage seam for the movement ledger.
///
/// There are deliberately no update operations: an acknowledged record is
/// write-once and remains readable after its product is tombstoned. The one
/// escape hatch is `truncate`, which unwinds appends that were never
/// acknowledged because a companion write failed.
pub trait MovementStore: Send + Sync {
    /// Append one movement to a product's stream.
    ///
    /// Implementations must check `expected` against the stream version (the
    /// sequence of the last appended movement, 0 for an empty stream), assign
    /// `sequence = version + 1`, and stamp `occurred_at` at insert time.
    fn append(
        &self,
        product_id: ProductId,
        draft: MovementDraft,
        expected: ExpectedVersion,
    ) -> Result<StockMovement, StoreError>;

    /// Movements in causal (insertion) order, optionally filtered to one
    /// product. Presentation order (newest-first) is a caller concern.
    fn history(&self, product_id: Option<ProductId>) -> Result<Vec<StockMovement>, StoreError>;

    /// Current stream version for a product (0 if no movements exist).
    fn stream_version(&self, product_id: ProductId) -> Result<u64, StoreError>;

    /// Discard movements with a sequence above `version`, restoring the
    /// stream version. Only for unwinding an append whose registration never
    /// completed; a no-op when the stream is already at or below `version`.
    fn truncate(&self, product_id: ProductId, version: u64) -> Result<(), StoreError>;
}

impl<S> MovementStore for Arc<S>
where
    S: MovementStore + ?Sized,
{
    fn append(
        &self,
        product_id: ProductId,
        draft: MovementDraft,
        expected: ExpectedVersion,
    ) -> Result<StockMovement, StoreError> {
        (**self).append(product_id, draft, expected)
    }

    fn history(&self, product_id: Option<ProductId>) -> Result<Vec<StockMovement>, StoreError> {
        (**self).history(product_id)
    }

    fn stream_version(&self, product_id: ProductId) -> Result<u64, StoreError> {
        (**self).stream_version(product_id)
    }

    fn truncate(&self, product_id: ProductId, version: u64) -> Result<(), StoreError> {
        (**self).truncate(product_id, version)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Global log in insertion order (causal order across all products).
    log: Vec<StockMovement>,
    /// Last assigned sequence per product stream.
    versions: HashMap<ProductId, u64>,
}

/// In-memory append-only movement store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementStore {
    state: RwLock<LedgerState>,
}

impl InMemoryMovementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovementStore for InMemoryMovementStore {
    fn append(
        &self,
        product_id: ProductId,
        draft: MovementDraft,
        expected: ExpectedVersion,
    ) -> Result<StockMovement, StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let current = *state.versions.get(&product_id).unwrap_or(&0);
        if !expected.matches(current) {
            return Err(StoreError::Concurrency(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        let movement = StockMovement {
            id: MovementId::new(),
            product_id,
            kind: draft.kind,
            quantity: draft.quantity,
            note: draft.note,
            occurred_at: Utc::now(),
            sequence: current + 1,
        };

        state.versions.insert(product_id, movement.sequence);
        state.log.push(movement.clone());
        Ok(movement)
    }

    fn history(&self, product_id: Option<ProductId>) -> Result<Vec<StockMovement>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(state
            .log
            .iter()
            .filter(|m| product_id.is_none_or(|pid| m.product_id == pid))
            .cloned()
            .collect())
    }

    fn stream_version(&self, product_id: ProductId) -> Result<u64, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(*state.versions.get(&product_id).unwrap_or(&0))
    }

    fn truncate(&self, product_id: ProductId, version: u64) -> Result<(), StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let current = *state.versions.get(&product_id).unwrap_or(&0);
        if current <= version {
            return Ok(());
        }

        state
            .log
            .retain(|m| m.product_id != product_id || m.sequence <= version);
        if version == 0 {
            state.versions.remove(&product_id);
        } else {
            state.versions.insert(product_id, version);
        }
        Ok(())
    }
}
