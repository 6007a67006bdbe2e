use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use catalog_products::{Category, Product};

use super::r#trait::{ProductStore, StoreError, StoreResult};

/// In-memory product store.
///
/// Intended for tests/dev. Ids are assigned from a monotone counter, matching
/// the SERIAL semantics of the Postgres store; iteration order is by id.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<i32, Product>,
    next_id: i32,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn filtered(&self, pred: impl Fn(&Product) -> bool) -> StoreResult<Vec<Product>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.rows.values().filter(|p| pred(p)).cloned().collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: Product) -> StoreResult<Product> {
        if let Some(id) = product.id {
            return Err(StoreError::InvalidState(format!(
                "create called on a record that already has id {id}"
            )));
        }

        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.next_id += 1;
        let id = inner.next_id;
        let created = Product {
            id: Some(id),
            ..product
        };
        inner.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, product: Product) -> StoreResult<Product> {
        let id = product.id.ok_or_else(|| {
            StoreError::InvalidState("update called on a record with no id".to_string())
        })?;

        let mut inner = self.inner.write().map_err(poisoned)?;
        if !inner.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        inner.rows.insert(id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        Ok(inner.rows.remove(&id).is_some())
    }

    async fn find(&self, id: i32) -> StoreResult<Option<Product>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn all(&self) -> StoreResult<Vec<Product>> {
        self.filtered(|_| true)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Product>> {
        self.filtered(|p| p.name == name)
    }

    async fn find_by_category(&self, category: Category) -> StoreResult<Vec<Product>> {
        self.filtered(|p| p.category == category)
    }

    async fn find_by_availability(&self, available: bool) -> StoreResult<Vec<Product>> {
        self.filtered(|p| p.available == available)
    }
}
