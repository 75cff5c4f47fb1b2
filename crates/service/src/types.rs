use serde::{Deserialize, Serialize};

use kardex_catalog::Product;
use kardex_ledger::StockMovement;
use kardex_projector::{classify, StockGauge};

/// A product record with its derived display classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product: Product,
    pub gauge: StockGauge,
}

impl From<Product> for ProductSnapshot {
    fn from(product: Product) -> Self {
        let gauge = classify(product.stock_quantity);
        Self { product, gauge }
    }
}

/// Result of a committed movement registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReceipt {
    pub movement: StockMovement,
    pub new_quantity: u64,
    pub gauge: StockGauge,
}
