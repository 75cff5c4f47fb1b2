//! Per-product exclusive scope for movement registration.
//!
//! The denormalized stock quantity is the only shared mutable state that
//! needs mutual exclusion: writers to the same product must serialize, writers
//! to different products proceed in parallel, and snapshot readers take the
//! shared side so they never observe a half-applied registration.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use kardex_core::ProductId;

/// Registry of per-product locks.
///
/// Lock handles are created lazily on first use and shared by all callers
/// touching the same product id. The lock guards no data of its own; the
/// stores hold the records. Poisoning is ignored: a panicking writer leaves
/// the stores untouched or fully written, never half-written, so the marker
/// lock itself carries no invalid state.
#[derive(Debug, Default)]
pub struct ProductLocks {
    inner: Mutex<HashMap<ProductId, Arc<RwLock<()>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the lock for one product.
    ///
    /// Entries no one holds a handle to anymore are dropped on the way in,
    /// so the registry stays proportional to the products under contention
    /// rather than every product ever touched.
    pub fn handle(&self, product_id: ProductId) -> Arc<RwLock<()>> {
        let mut map = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
        map.entry(product_id).or_default().clone()
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        match self.inner.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

/// Acquire the write side of a product lock, recovering from poisoning.
pub fn write_guard(lock: &RwLock<()>) -> std::sync::RwLockWriteGuard<'_, ()> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Acquire the read side of a product lock, recovering from poisoning.
pub fn read_guard(lock: &RwLock<()>) -> std::sync::RwLockReadGuard<'_, ()> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_product_shares_a_handle() {
        let locks = ProductLocks::new();
        let pid = ProductId::new();
        let a = locks.handle(pid);
        let b = locks.handle(pid);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn idle_entries_are_pruned_while_held_ones_survive() {
        let locks = ProductLocks::new();
        for _ in 0..64 {
            drop(locks.handle(ProductId::new()));
        }

        let pid = ProductId::new();
        let held = locks.handle(pid);
        let _ = locks.handle(ProductId::new());
        // The 64 released entries are gone; the held one and the fresh fetch
        // remain.
        assert_eq!(locks.tracked(), 2);
        assert!(Arc::ptr_eq(&held, &locks.handle(pid)));
    }

    #[test]
    fn different_products_do_not_share() {
        let locks = ProductLocks::new();
        let a = locks.handle(ProductId::new());
        let b = locks.handle(ProductId::new());
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
