//! Product store: trait plus Postgres and in-memory implementations.

mod in_memory;
mod postgres;
mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError, StoreResult};
