//! Product catalog domain module.
//!
//! This crate contains the product record and its validation rules,
//! implemented purely as deterministic domain logic (no IO, no storage).
//! The product's stock quantity is a projection maintained by the service
//! layer; nothing in this crate allows setting it directly.

pub mod product;

pub use product::{NewProduct, Product, ProductPatch, DEFAULT_STOCK_MAX, DEFAULT_STOCK_MIN};
