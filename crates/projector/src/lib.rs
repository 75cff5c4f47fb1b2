//! Stock projection: derive the current quantity and its display
//! classification from ledger movements.
//!
//! Everything here is a pure, deterministic function. The side effect of
//! writing the derived quantity back onto the product record belongs to the
//! service layer, which applies it atomically with the ledger append.

pub mod projection;
pub mod stock_level;

pub use projection::{apply_movement, project};
pub use stock_level::{classify, StockGauge, StockLevel};
