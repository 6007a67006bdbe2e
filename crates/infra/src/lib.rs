//! `catalog-infra` — persistence for the product catalog.
//!
//! All store access goes through the [`store::ProductStore`] trait; the rest
//! of the system never touches a connection or a row directly.

pub mod store;


pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
