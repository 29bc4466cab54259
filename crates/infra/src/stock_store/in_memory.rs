use std::collections::HashSet;
use std::sync::RwLock;

use brickstore_core::{CombinationId, ProductId};
use brickstore_stock::StockEntry;

use super::StockEntryQueries;
use crate::document_store::StoreError;

/// In-memory stock entry collection.
///
/// Doubles as the write side for tests and dev seeding; the catalog itself
/// only ever reads through [`StockEntryQueries`].
#[derive(Debug, Default)]
pub struct InMemoryStockEntryStore {
    entries: RwLock<Vec<StockEntry>>,
}

impl InMemoryStockEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: StockEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(entry);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl StockEntryQueries for InMemoryStockEntryStore {
    fn has_entries_for_product(&self, product_id: ProductId) -> Result<bool, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(entries.iter().any(|e| e.product_id() == product_id))
    }

    fn locked_combination_ids(
        &self,
        product_id: ProductId,
    ) -> Result<HashSet<CombinationId>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .filter(|e| e.product_id() == product_id)
            .filter_map(|e| e.combination_id())
            .collect())
    }
}
