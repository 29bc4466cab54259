//! Postgres-backed stock entry lookups.
//!
//! The `stock_entries` table is owned by the warehouse import workflow; the
//! catalog only reads existence and distinct-combination answers from it.

use std::collections::HashSet;

use sqlx::{PgPool, Row};
use std::sync::Arc;

use brickstore_core::{CombinationId, ProductId};

use super::StockEntryQueries;
use crate::document_store::StoreError;

#[derive(Debug, Clone)]
pub struct PostgresStockEntryStore {
    pool: Arc<PgPool>,
}

impl PostgresStockEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn has_entries(&self, product_id: ProductId) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM stock_entries WHERE product_id = $1) AS present",
        )
        .bind(product_id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("stock existence query failed: {e}")))?;

        row.try_get("present")
            .map_err(|e| StoreError::Backend(format!("failed to read existence flag: {e}")))
    }

    pub async fn locked_ids(
        &self,
        product_id: ProductId,
    ) -> Result<HashSet<CombinationId>, StoreError> {
        let rows = sqlx::query(
            "SELECT DISTINCT combination_id FROM stock_entries \
             WHERE product_id = $1 AND combination_id IS NOT NULL",
        )
        .bind(product_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| StoreError::Backend(format!("stock distinct query failed: {e}")))?;

        let mut ids = HashSet::with_capacity(rows.len());
        for row in rows {
            let id: uuid::Uuid = row
                .try_get("combination_id")
                .map_err(|e| StoreError::Backend(format!("failed to read combination_id: {e}")))?;
            ids.insert(CombinationId::from_uuid(id));
        }
        Ok(ids)
    }
}

impl StockEntryQueries for PostgresStockEntryStore {
    fn has_entries_for_product(&self, product_id: ProductId) -> Result<bool, StoreError> {
        let handle = runtime_handle()?;
        tokio::task::block_in_place(|| handle.block_on(self.has_entries(product_id)))
    }

    fn locked_combination_ids(
        &self,
        product_id: ProductId,
    ) -> Result<HashSet<CombinationId>, StoreError> {
        let handle = runtime_handle()?;
        tokio::task::block_in_place(|| handle.block_on(self.locked_ids(product_id)))
    }
}

fn runtime_handle() -> Result<tokio::runtime::Handle, StoreError> {
    tokio::runtime::Handle::try_current().map_err(|_| {
        StoreError::Backend(
            "PostgresStockEntryStore requires an async runtime (tokio); \
             ensure you're calling from within a tokio runtime context"
                .to_string(),
        )
    })
}
