use chrono::Utc;
use tracing::{debug, error, info, warn};

use kardex_catalog::{NewProduct, Product, ProductPatch};
use kardex_core::{ExpectedVersion, InventoryError, InventoryResult, ProductId};
use kardex_events::EventBus;
use kardex_infra::{MovementStore, ProductStore};
use kardex_ledger::{MovementDraft, MovementKind, StockMovement};
use kardex_projector::{apply_movement, classify};

use crate::events::{
    InventoryEvent, MovementRegistered, ProductCreated, ProductDeactivated, ProductUpdated,
};
use crate::locks::{read_guard, write_guard, ProductLocks};
use crate::types::{MovementReceipt, ProductSnapshot};

/// Bounded internal retry for storage contention (`Conflict`/`Transient`).
/// Domain rejections are never retried.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Orchestrates catalog, ledger and projector.
///
/// Writes to one product are serialized through a per-product lock; the
/// validate/append/update-quantity triple of `register_movement` runs entirely
/// inside it, so no observer sees a ledger entry whose quantity update will
/// not land. Reads of a single product take the shared side of the same lock;
/// listings and history queries go straight to the stores.
#[derive(Debug)]
pub struct InventoryService<P, M, B> {
    products: P,
    movements: M,
    bus: B,
    locks: ProductLocks,
}

impl<P, M, B> InventoryService<P, M, B>
where
    P: ProductStore,
    M: MovementStore,
    B: EventBus<InventoryEvent>,
{
    pub fn new(products: P, movements: M, bus: B) -> Self {
        Self {
            products,
            movements,
            bus,
            locks: ProductLocks::new(),
        }
    }

    /// Create a product.
    ///
    /// A non-zero initial stock is recorded as a synthesized entrada so the
    /// quantity equals the ledger fold from the very first record (an initial
    /// stock of zero needs no movement: the empty fold is zero).
    pub fn create_product(&self, new: NewProduct) -> InventoryResult<ProductSnapshot> {
        let now = Utc::now();
        let product = Product::create(ProductId::new(), new, now)?;
        let initial_stock = product.stock_quantity;
        let product_id = product.id;

        // Hold the product's exclusive section across the entrada + insert so
        // no snapshot observes the quantity without its movement.
        let handle = self.locks.handle(product_id);
        let _scope = write_guard(&handle);

        // The synthesized entrada lands before the catalog record; if the
        // insert then fails (duplicate sku, outage) the entrada is unwound,
        // leaving no trace of the aborted creation.
        let initial_movement = if initial_stock > 0 {
            let draft = MovementDraft::new(
                MovementKind::Entrada,
                initial_stock,
                Some("stock inicial".to_string()),
            )?;
            Some(
                self.movements
                    .append(product_id, draft, ExpectedVersion::Exact(0))?,
            )
        } else {
            None
        };

        let stored = match self.products.insert(product) {
            Ok(stored) => stored,
            Err(err) => {
                let err = err.into();
                self.unwind_append(product_id, 0, &err);
                return Err(err);
            }
        };

        self.publish(InventoryEvent::ProductCreated(ProductCreated {
            product_id: stored.id,
            name: stored.name.clone(),
            occurred_at: now,
        }));
        if let Some(movement) = initial_movement {
            self.publish(InventoryEvent::MovementRegistered(MovementRegistered {
                movement,
                new_quantity: initial_stock,
            }));
        }

        info!(product_id = %stored.id, initial_stock, "product created");
        Ok(stored.into())
    }

    /// Partial edit of the mutable fields. The stock quantity is not
    /// reachable through this path; it only moves via `register_movement`.
    pub fn update_product(
        &self,
        product_id: ProductId,
        patch: ProductPatch,
    ) -> InventoryResult<ProductSnapshot> {
        if patch.is_empty() {
            return self.product_snapshot(product_id);
        }

        let handle = self.locks.handle(product_id);
        let _scope = write_guard(&handle);

        let mut attempt = 1;
        let updated = loop {
            let mut product = self.active_product(product_id)?;
            product.apply_patch(patch.clone(), Utc::now())?;
            let expected = ExpectedVersion::Exact(product.version);
            match self.products.update(product, expected) {
                Ok(updated) => break updated,
                Err(err) => self.backoff_or_bail(&mut attempt, err.into(), "product update")?,
            }
        };

        self.publish(InventoryEvent::ProductUpdated(ProductUpdated {
            product_id,
            occurred_at: updated.last_registered_at,
        }));
        info!(product_id = %product_id, version = updated.version, "product updated");
        Ok(updated.into())
    }

    /// Tombstone a product.
    ///
    /// The record is deactivated, not removed: its movement history stays
    /// queryable for audit, and further registrations against it fail with
    /// `NotFound`.
    pub fn delete_product(&self, product_id: ProductId) -> InventoryResult<()> {
        let handle = self.locks.handle(product_id);
        let _scope = write_guard(&handle);

        let now = Utc::now();
        let mut attempt = 1;
        loop {
            let mut product = self.active_product(product_id)?;
            product.active = false;
            product.last_registered_at = now;
            let expected = ExpectedVersion::Exact(product.version);
            match self.products.update(product, expected) {
                Ok(_) => break,
                Err(err) => self.backoff_or_bail(&mut attempt, err.into(), "product delete")?,
            }
        }

        self.publish(InventoryEvent::ProductDeactivated(ProductDeactivated {
            product_id,
            occurred_at: now,
        }));
        info!(product_id = %product_id, "product deactivated");
        Ok(())
    }

    /// Register an entrada or salida against a product.
    ///
    /// Under the product's exclusive section: validate the resulting quantity
    /// (a salida below zero aborts with `InsufficientStock` and no ledger
    /// append), append the movement, then persist the derived quantity. A
    /// surfaced error means the registration took no effect: a failed
    /// quantity write unwinds the appended movement, so callers may retry a
    /// `Transient` outcome safely.
    pub fn register_movement(
        &self,
        product_id: ProductId,
        kind: MovementKind,
        quantity: u64,
        note: Option<String>,
    ) -> InventoryResult<MovementReceipt> {
        let draft = MovementDraft::new(kind, quantity, note)?;

        let handle = self.locks.handle(product_id);
        let _scope = write_guard(&handle);

        let product = self.active_product(product_id)?;
        let new_quantity = apply_movement(product.stock_quantity, kind, quantity)?;

        let stream_version = self.movements.stream_version(product_id)?;
        let movement = self
            .movements
            .append(product_id, draft, ExpectedVersion::Exact(stream_version))?;

        // The append and the quantity write commit together or not at all: if
        // the quantity cannot be persisted, the appended movement is unwound
        // before the error surfaces, so the ledger fold never diverges from
        // the stored quantity.
        if let Err(err) = self.commit_quantity(product_id, &movement, new_quantity) {
            self.unwind_append(product_id, stream_version, &err);
            return Err(err);
        }

        self.publish(InventoryEvent::MovementRegistered(MovementRegistered {
            movement: movement.clone(),
            new_quantity,
        }));
        info!(
            product_id = %product_id,
            kind = %kind,
            quantity,
            new_quantity,
            sequence = movement.sequence,
            "movement registered"
        );

        Ok(MovementReceipt {
            movement,
            new_quantity,
            gauge: classify(new_quantity),
        })
    }

    /// Current state of one product (quantity plus classification).
    ///
    /// Takes the shared side of the product lock, so an in-flight registration
    /// is observed either not at all or in full.
    pub fn product_snapshot(&self, product_id: ProductId) -> InventoryResult<ProductSnapshot> {
        let handle = self.locks.handle(product_id);
        let _scope = read_guard(&handle);

        Ok(self.active_product(product_id)?.into())
    }

    /// Active products, optionally filtered by a case-insensitive name
    /// substring, in creation order.
    pub fn list_products(&self, filter: Option<&str>) -> InventoryResult<Vec<ProductSnapshot>> {
        let all = self.products.list()?;
        debug!(total = all.len(), ?filter, "catalog listed");
        Ok(all
            .into_iter()
            .filter(|p| p.active)
            .filter(|p| filter.is_none_or(|f| p.name_matches(f)))
            .map(ProductSnapshot::from)
            .collect())
    }

    /// Movement history in causal order, optionally for one product. History
    /// remains queryable for tombstoned products (audit trail).
    pub fn list_movements(
        &self,
        product_id: Option<ProductId>,
    ) -> InventoryResult<Vec<StockMovement>> {
        Ok(self.movements.history(product_id)?)
    }

    /// Load a product, treating tombstoned records as absent.
    fn active_product(&self, product_id: ProductId) -> InventoryResult<Product> {
        let product = self.products.get(product_id)?;
        if !product.active {
            return Err(InventoryError::not_found());
        }
        Ok(product)
    }

    /// Persist the derived quantity for a just-appended movement.
    ///
    /// Runs under the product's write lock, so a version conflict can only
    /// come from a writer bypassing the service; contention is retried a
    /// bounded number of times before surfacing.
    fn commit_quantity(
        &self,
        product_id: ProductId,
        movement: &StockMovement,
        new_quantity: u64,
    ) -> InventoryResult<Product> {
        let mut attempt = 1;
        loop {
            let mut product = self.products.get(product_id)?;
            product.stock_quantity = new_quantity;
            product.last_registered_at = movement.occurred_at;
            let expected = ExpectedVersion::Exact(product.version);
            match self.products.update(product, expected) {
                Ok(updated) => return Ok(updated),
                Err(err) => self.backoff_or_bail(&mut attempt, err.into(), "quantity commit")?,
            }
        }
    }

    /// Roll a product's stream back to `version` after a companion write
    /// failed, so the aborted operation leaves no ledger entry behind.
    ///
    /// If the unwind itself fails the stream is left ahead of the stored
    /// quantity; that is logged at error level for operator reconciliation.
    fn unwind_append(&self, product_id: ProductId, version: u64, cause: &InventoryError) {
        if let Err(unwind_err) = self.movements.truncate(product_id, version) {
            error!(
                product_id = %product_id,
                version,
                cause = %cause,
                error = %unwind_err,
                "failed to unwind appended movement; ledger ahead of stored quantity"
            );
        }
    }

    /// Bounded retry policy: retryable storage errors are attempted again up
    /// to `MAX_COMMIT_ATTEMPTS`; everything else surfaces immediately.
    fn backoff_or_bail(
        &self,
        attempt: &mut u32,
        err: InventoryError,
        operation: &str,
    ) -> InventoryResult<()> {
        if err.is_retryable() && *attempt < MAX_COMMIT_ATTEMPTS {
            warn!(attempt, error = %err, operation, "retrying after storage contention");
            *attempt += 1;
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Publish a post-commit event.
    ///
    /// The write has already landed; a failed publication is logged and the
    /// operation still succeeds. Consumers recover by re-reading the catalog
    /// or replaying the ledger.
    fn publish(&self, event: InventoryEvent) {
        if let Err(err) = self.bus.publish(event) {
            warn!(error = ?err, "event publication failed after commit");
        }
    }
}
