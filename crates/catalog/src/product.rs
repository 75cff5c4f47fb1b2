use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kardex_core::{InventoryError, InventoryResult, ProductId};

/// Advisory threshold defaults, matching the catalog's observed form defaults.
pub const DEFAULT_STOCK_MIN: u64 = 5;
pub const DEFAULT_STOCK_MAX: u64 = 100;

/// Product record.
///
/// `stock_quantity` is a derived projection: it equals the fold of all ledger
/// movements for this product and is only ever written by the service layer
/// when a movement commits. `version` is bumped by the store on each committed
/// mutation and drives the optimistic concurrency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Optional user-assigned code; unique across active and inactive products
    /// when present (uniqueness is enforced by the store).
    pub sku: Option<String>,
    pub name: String,
    /// Sale price in the smallest currency unit (e.g. cents).
    pub sale_price: u64,
    /// Derived stock quantity (see invariant above). Never negative.
    pub stock_quantity: u64,
    pub stock_min: u64,
    pub stock_max: u64,
    pub description: Option<String>,
    /// Reference to stored media (path or object key).
    pub image_ref: Option<String>,
    /// Tombstone flag: deleted products are deactivated, not removed, so the
    /// movement history keeps a resolvable product id.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last committed mutation (edit or movement).
    pub last_registered_at: DateTime<Utc>,
    pub version: u64,
}

/// Input for creating a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sale_price: u64,
    /// Initial stock. The service synthesizes an entrada movement for this
    /// amount so the ledger fold matches from the first record.
    pub initial_stock: u64,
    pub stock_min: Option<u64>,
    pub stock_max: Option<u64>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub image_ref: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, sale_price: u64, initial_stock: u64) -> Self {
        Self {
            name: name.into(),
            sale_price,
            initial_stock,
            stock_min: None,
            stock_max: None,
            sku: None,
            description: None,
            image_ref: None,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_thresholds(mut self, min: u64, max: u64) -> Self {
        self.stock_min = Some(min);
        self.stock_max = Some(max);
        self
    }
}

/// Partial update of the mutable product fields.
///
/// There is deliberately no quantity field here: stock is only mutated through
/// movement registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sale_price: Option<u64>,
    pub stock_min: Option<u64>,
    pub stock_max: Option<u64>,
    /// `Some(None)` clears the field, `Some(Some(..))` replaces it.
    pub sku: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub image_ref: Option<Option<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Product {
    /// Validate creation input and build the record.
    ///
    /// The caller (the store) assigns no fields; `stock_quantity` starts at the
    /// declared initial stock, with the matching entrada synthesized by the
    /// service so the fold invariant holds from creation onward.
    pub fn create(id: ProductId, new: NewProduct, now: DateTime<Utc>) -> InventoryResult<Self> {
        let name = normalize_name(&new.name)?;
        let sku = normalize_optional(new.sku);
        let stock_min = new.stock_min.unwrap_or(DEFAULT_STOCK_MIN);
        let stock_max = new.stock_max.unwrap_or(DEFAULT_STOCK_MAX);
        check_thresholds(stock_min, stock_max)?;

        Ok(Self {
            id,
            sku,
            name,
            sale_price: new.sale_price,
            stock_quantity: new.initial_stock,
            stock_min,
            stock_max,
            description: normalize_optional(new.description),
            image_ref: normalize_optional(new.image_ref),
            active: true,
            created_at: now,
            last_registered_at: now,
            version: 0,
        })
    }

    /// Apply a partial edit. Quantity and activation state are untouched.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> InventoryResult<()> {
        if let Some(name) = patch.name {
            self.name = normalize_name(&name)?;
        }
        if let Some(price) = patch.sale_price {
            self.sale_price = price;
        }

        let stock_min = patch.stock_min.unwrap_or(self.stock_min);
        let stock_max = patch.stock_max.unwrap_or(self.stock_max);
        check_thresholds(stock_min, stock_max)?;
        self.stock_min = stock_min;
        self.stock_max = stock_max;

        if let Some(sku) = patch.sku {
            self.sku = normalize_optional(sku);
        }
        if let Some(description) = patch.description {
            self.description = normalize_optional(description);
        }
        if let Some(image_ref) = patch.image_ref {
            self.image_ref = normalize_optional(image_ref);
        }

        self.last_registered_at = now;
        Ok(())
    }

    /// Case-insensitive substring match on the product name.
    pub fn name_matches(&self, filter: &str) -> bool {
        self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

fn normalize_name(name: &str) -> InventoryResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::validation("name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn check_thresholds(min: u64, max: u64) -> InventoryResult<()> {
    if min > max {
        return Err(InventoryError::validation(format!(
            "stock_min ({min}) cannot exceed stock_max ({max})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_product() -> NewProduct {
        NewProduct::new("Caja de tornillos", 1250, 40)
    }

    #[test]
    fn create_applies_threshold_defaults() {
        let p = Product::create(ProductId::new(), base_product(), Utc::now()).unwrap();
        assert_eq!(p.stock_min, DEFAULT_STOCK_MIN);
        assert_eq!(p.stock_max, DEFAULT_STOCK_MAX);
        assert_eq!(p.stock_quantity, 40);
        assert!(p.active);
        assert_eq!(p.version, 0);
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut s = base_product();
        s.name = "   ".to_string();
        assert!(matches!(
            Product::create(ProductId::new(), s, Utc::now()),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_inverted_thresholds() {
        let s = base_product().with_thresholds(50, 10);
        assert!(matches!(
            Product::create(ProductId::new(), s, Utc::now()),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn blank_sku_is_normalized_to_none() {
        let s = base_product().with_sku("  ");
        let p = Product::create(ProductId::new(), s, Utc::now()).unwrap();
        assert_eq!(p.sku, None);
    }

    #[test]
    fn patch_cannot_touch_quantity_or_activation() {
        let mut p = Product::create(ProductId::new(), base_product(), Utc::now()).unwrap();
        let patch = ProductPatch {
            name: Some("Caja grande".to_string()),
            sale_price: Some(1500),
            ..Default::default()
        };
        p.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(p.name, "Caja grande");
        assert_eq!(p.sale_price, 1500);
        assert_eq!(p.stock_quantity, 40);
        assert!(p.active);
    }

    #[test]
    fn patch_validates_combined_thresholds() {
        let mut p = Product::create(ProductId::new(), base_product(), Utc::now()).unwrap();
        // Existing max is 100; raising min above it must fail.
        let patch = ProductPatch {
            stock_min: Some(150),
            ..Default::default()
        };
        assert!(p.apply_patch(patch, Utc::now()).is_err());
        assert_eq!(p.stock_min, DEFAULT_STOCK_MIN);
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut p =
            Product::create(ProductId::new(), base_product().with_sku("TOR-001"), Utc::now()).unwrap();
        let patch = ProductPatch {
            sku: Some(None),
            ..Default::default()
        };
        p.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(p.sku, None);
    }

    #[test]
    fn name_filter_is_case_insensitive() {
        let p = Product::create(ProductId::new(), base_product(), Utc::now()).unwrap();
        assert!(p.name_matches("TORNILLOS"));
        assert!(p.name_matches("caja"));
        assert!(!p.name_matches("clavos"));
    }
}
