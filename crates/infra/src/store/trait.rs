use async_trait::async_trait;
use thiserror::Error;

use catalog_products::{Category, Product};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error.
///
/// Domain validation never shows up here; this is strictly about the
/// persistence boundary (driver failures, undecodable rows, misuse of the
/// record lifecycle).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed (connection, query, pool).
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored row could not be mapped back into a record.
    #[error("failed to decode stored row: {0}")]
    Decode(String),

    /// The record's lifecycle state does not permit the operation
    /// (e.g. create with an id already set, update with no id).
    #[error("invalid record state: {0}")]
    InvalidState(String),

    /// The record targeted by an update no longer exists.
    #[error("record not found: id {0}")]
    NotFound(i32),
}

/// Persistence operations over Product records.
///
/// Every query hits the store directly; there is no cache or secondary index.
/// Implementations must be shareable across request handlers (`Send + Sync`).
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new record and return it with the store-assigned id.
    ///
    /// Fails with [`StoreError::InvalidState`] if the record already has an id.
    async fn create(&self, product: Product) -> StoreResult<Product>;

    /// Persist changes to an existing record identified by its current id.
    ///
    /// Fails with [`StoreError::InvalidState`] if the id is unset, and with
    /// [`StoreError::NotFound`] if no row with that id exists.
    async fn update(&self, product: Product) -> StoreResult<Product>;

    /// Hard-delete the record with the given id. Returns whether a row was
    /// actually removed.
    async fn delete(&self, id: i32) -> StoreResult<bool>;

    /// Fetch a record by id. Absence is `None`, never an error.
    async fn find(&self, id: i32) -> StoreResult<Option<Product>>;

    /// Every persisted record, in store-defined order.
    async fn all(&self) -> StoreResult<Vec<Product>>;

    /// Records with an exact, case-sensitive name match.
    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Product>>;

    /// Records in the given category.
    async fn find_by_category(&self, category: Category) -> StoreResult<Vec<Product>>;

    /// Records with the given availability flag.
    async fn find_by_availability(&self, available: bool) -> StoreResult<Vec<Product>>;
}
