//! `catalog-products` — the Product record model.
//!
//! Owns the `Product` entity, its `Category` enum, and the JSON key-value
//! (de)serialization contract between the wire representation and the record.

pub mod product;

pub use product::{Category, Product};
