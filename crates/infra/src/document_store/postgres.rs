//! Postgres-backed product document store.
//!
//! Each product is persisted as one JSONB document keyed by its id, next to a
//! `revision` column used for compare-and-swap writes. Holding the whole
//! aggregate in a single row keeps the save atomic without transactions
//! spanning multiple tables.
//!
//! ## Error Mapping
//!
//! | Situation | StoreError |
//! |---|---|
//! | CAS update matched zero rows | `Concurrency` |
//! | Unique violation on insert (revision 0 raced) | `Concurrency` |
//! | serde (de)serialization failure | `Serialization` |
//! | Any other sqlx error | `Backend` |

use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::instrument;

use brickstore_catalog::Product;
use brickstore_core::{ExpectedVersion, ProductId};

use super::r#trait::{ProductStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    revision    BIGINT NOT NULL,
    doc         JSONB NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Postgres-backed product document store.
///
/// Uses the SQLx connection pool, which handles thread-safe connection
/// management; the store itself is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn load_doc(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT doc FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_doc", e))?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row
                    .try_get("doc")
                    .map_err(|e| StoreError::Backend(format!("failed to read doc column: {e}")))?;
                let product: Product = serde_json::from_value(doc)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    #[instrument(
        skip(self, product),
        fields(product_id = %product.id_typed(), expected = ?expected),
        err
    )]
    pub async fn save_doc(
        &self,
        product: &Product,
        expected: ExpectedVersion,
    ) -> Result<u64, StoreError> {
        let mut stored = product.clone();

        match expected {
            ExpectedVersion::Exact(0) => {
                stored.set_revision(1);
                let doc = to_doc(&stored)?;
                sqlx::query(
                    "INSERT INTO products (id, revision, doc, updated_at) VALUES ($1, 1, $2, NOW())",
                )
                .bind(product.id_typed().as_uuid())
                .bind(&doc)
                .execute(&*self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        StoreError::Concurrency(
                            "document was created concurrently (expected revision 0)".to_string(),
                        )
                    } else {
                        map_sqlx_error("insert_doc", e)
                    }
                })?;
                Ok(1)
            }
            ExpectedVersion::Exact(revision) => {
                let next = revision + 1;
                stored.set_revision(next);
                let doc = to_doc(&stored)?;
                let result = sqlx::query(
                    "UPDATE products SET doc = $2, revision = $3, updated_at = NOW() \
                     WHERE id = $1 AND revision = $4",
                )
                .bind(product.id_typed().as_uuid())
                .bind(&doc)
                .bind(next as i64)
                .bind(revision as i64)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("update_doc", e))?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::Concurrency(format!(
                        "expected revision {revision}, but the stored document moved on"
                    )));
                }
                Ok(next)
            }
            ExpectedVersion::Any => {
                // Read-modify-write without a guard; last writer wins.
                let current = sqlx::query("SELECT revision FROM products WHERE id = $1")
                    .bind(product.id_typed().as_uuid())
                    .fetch_optional(&*self.pool)
                    .await
                    .map_err(|e| map_sqlx_error("read_revision", e))?
                    .map(|row| row.try_get::<i64, _>("revision"))
                    .transpose()
                    .map_err(|e| StoreError::Backend(format!("failed to read revision: {e}")))?
                    .unwrap_or(0) as u64;

                let next = current + 1;
                stored.set_revision(next);
                let doc = to_doc(&stored)?;
                sqlx::query(
                    "INSERT INTO products (id, revision, doc, updated_at) VALUES ($1, $2, $3, NOW()) \
                     ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc, revision = EXCLUDED.revision, updated_at = NOW()",
                )
                .bind(product.id_typed().as_uuid())
                .bind(next as i64)
                .bind(&doc)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("upsert_doc", e))?;
                Ok(next)
            }
        }
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_doc(&self, id: ProductId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_doc", e))?;
        Ok(())
    }
}

fn to_doc(product: &Product) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(product).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

impl ProductStore for PostgresProductStore {
    // The ProductStore trait is synchronous, but Postgres operations require
    // async. We use tokio::runtime::Handle to run async code in a sync
    // context; callers must be inside a tokio runtime.

    fn load(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let handle = runtime_handle()?;
        tokio::task::block_in_place(|| handle.block_on(self.load_doc(id)))
    }

    fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<u64, StoreError> {
        let handle = runtime_handle()?;
        tokio::task::block_in_place(|| handle.block_on(self.save_doc(product, expected)))
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let handle = runtime_handle()?;
        tokio::task::block_in_place(|| handle.block_on(self.delete_doc(id)))
    }
}

fn runtime_handle() -> Result<tokio::runtime::Handle, StoreError> {
    tokio::runtime::Handle::try_current().map_err(|_| {
        StoreError::Backend(
            "PostgresProductStore requires an async runtime (tokio); \
             ensure you're calling from within a tokio runtime context"
                .to_string(),
        )
    })
}
