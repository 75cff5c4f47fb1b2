use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use kardex_catalog::Product;
use kardex_core::{ExpectedVersion, ProductId};

use super::StoreError;

/// Durable storage seam for product records.
///
/// Implementations must enforce sku uniqueness across all records (active and
/// tombstoned) and optimistic concurrency on `update`. Reads return committed
/// state only.
pub trait ProductStore: Send + Sync {
    /// Insert a new record. Assigns version 1.
    fn insert(&self, product: Product) -> Result<Product, StoreError>;

    /// Fetch a record by id (tombstoned records included; callers decide).
    fn get(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Replace a record if the stored version matches `expected`; bumps the
    /// version by one.
    fn update(&self, product: Product, expected: ExpectedVersion) -> Result<Product, StoreError>;

    /// All records in creation order.
    fn list(&self) -> Result<Vec<Product>, StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn insert(&self, product: Product) -> Result<Product, StoreError> {
        (**self).insert(product)
    }

    fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        (**self).get(id)
    }

    fn update(&self, product: Product, expected: ExpectedVersion) -> Result<Product, StoreError> {
        (**self).update(product, expected)
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }
}

/// In-memory product store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    records: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_sku_unique(
        records: &HashMap<ProductId, Product>,
        candidate: &Product,
    ) -> Result<(), StoreError> {
        if let Some(sku) = &candidate.sku {
            let taken = records
                .values()
                .any(|p| p.id != candidate.id && p.sku.as_deref() == Some(sku.as_str()));
            if taken {
                return Err(StoreError::DuplicateSku(sku.clone()));
            }
        }
        Ok(())
    }
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, mut product: Product) -> Result<Product, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        if records.contains_key(&product.id) {
            return Err(StoreError::Concurrency(format!(
                "product {} already exists",
                product.id
            )));
        }
        Self::check_sku_unique(&records, &product)?;

        product.version = 1;
        records.insert(product.id, product.clone());
        Ok(product)
    }

    fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        records.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn update(&self, mut product: Product, expected: ExpectedVersion) -> Result<Product, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let current = records.get(&product.id).ok_or(StoreError::NotFound)?;
        if !expected.matches(current.version) {
            return Err(StoreError::Concurrency(format!(
                "expected {expected:?}, found {}",
                current.version
            )));
        }
        Self::check_sku_unique(&records, &product)?;

        product.version = current.version + 1;
        records.insert(product.id, product.clone());
        Ok(product)
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut all: Vec<Product> = records.values().cloned().collect();
        // HashMap iteration order is arbitrary; creation order is the contract.
        all.sort_by_key(|p| (p.created_at, *p.id.as_uuid()));
        Ok(all)
    }
}
