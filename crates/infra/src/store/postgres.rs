//! Postgres-backed product store.
//!
//! Uses a SQLx connection pool; each call checks a connection out of the pool
//! for the duration of the query and releases it on completion, success or
//! failure. The store assigns ids via a `SERIAL` column, so they are unique
//! and monotone. `price` is stored as unconstrained `NUMERIC`, which keeps the
//! exact decimal scale a client supplied ("12.50" stays "12.50").

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{FromRow, Row};
use tracing::instrument;

use catalog_products::{Category, Product};

use super::r#trait::{ProductStore, StoreError, StoreResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          SERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price       NUMERIC NOT NULL,
    available   BOOLEAN NOT NULL,
    category    TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS products_name_idx ON products (name);
CREATE INDEX IF NOT EXISTS products_category_idx ON products (category);
"#;

/// Postgres implementation of [`ProductStore`].
///
/// Thread-safe: the SQLx pool is `Send + Sync` and handles connection
/// management internally.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Connect to the store using a Postgres connection string.
    pub async fn connect(database_uri: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_uri)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (shared with other components or tests).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `products` table and its indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn fetch_where(&self, sql: &str, bind: Bind<'_>) -> StoreResult<Vec<Product>> {
        let query = sqlx::query_as::<_, ProductRow>(sql);
        let query = match bind {
            Bind::None => query,
            Bind::Text(s) => query.bind(s),
            Bind::Bool(b) => query.bind(b),
        };
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch", e))?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }
}

enum Bind<'a> {
    None,
    Text(&'a str),
    Bool(bool),
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, product), fields(name = %product.name), err)]
    async fn create(&self, product: Product) -> StoreResult<Product> {
        if let Some(id) = product.id {
            return Err(StoreError::InvalidState(format!(
                "create called on a record that already has id {id}"
            )));
        }

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, description, price, available, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        Ok(Product {
            id: Some(id),
            ..product
        })
    }

    #[instrument(skip(self, product), fields(id = ?product.id), err)]
    async fn update(&self, product: Product) -> StoreResult<Product> {
        let id = product.id.ok_or_else(|| {
            StoreError::InvalidState("update called on a record with no id".to_string())
        })?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, available = $5,
                category = $6, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(product)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn find(&self, id: i32) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&select("WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find", e))?;
        row.map(ProductRow::into_product).transpose()
    }

    async fn all(&self) -> StoreResult<Vec<Product>> {
        self.fetch_where(&select(""), Bind::None).await
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Product>> {
        self.fetch_where(&select("WHERE name = $1"), Bind::Text(name))
            .await
    }

    async fn find_by_category(&self, category: Category) -> StoreResult<Vec<Product>> {
        self.fetch_where(&select("WHERE category = $1"), Bind::Text(category.as_str()))
            .await
    }

    async fn find_by_availability(&self, available: bool) -> StoreResult<Vec<Product>> {
        self.fetch_where(&select("WHERE available = $1"), Bind::Bool(available))
            .await
    }
}

fn select(where_clause: &str) -> String {
    format!(
        "SELECT id, name, description, price, available, category, created_at, updated_at \
         FROM products {where_clause} ORDER BY id"
    )
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{operation}: {err}"))
}

struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    available: bool,
    category: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            available: row.try_get("available")?,
            category: row.try_get("category")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl ProductRow {
    fn into_product(self) -> StoreResult<Product> {
        // Rows are only ever written through the store, so a category that no
        // longer parses means the stored data is corrupt.
        let category = Category::parse(&self.category)
            .map_err(|_| StoreError::Decode(format!("unknown stored category: {}", self.category)))?;
        Ok(Product {
            id: Some(self.id),
            name: self.name,
            description: self.description,
            price: self.price,
            available: self.available,
            category,
        })
    }
}
