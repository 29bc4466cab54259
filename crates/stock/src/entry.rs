use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brickstore_core::{CombinationId, Entity, ProductId, StockEntryId};

/// Lifecycle status of an imported stock batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockEntryStatus {
    Imported,
    Cancelled,
}

/// A batch of imported stock for a product, optionally bound to one
/// variant combination.
///
/// `combination_id = None` means the batch belongs to a product sold without
/// variants. The catalog never mutates stock entries; their mere existence
/// locks the referenced product/combination structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    id: StockEntryId,
    product_id: ProductId,
    combination_id: Option<CombinationId>,
    status: StockEntryStatus,
    remaining_quantity: u64,
    imported_at: DateTime<Utc>,
}

impl StockEntry {
    pub fn imported(
        product_id: ProductId,
        combination_id: Option<CombinationId>,
        remaining_quantity: u64,
        imported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: StockEntryId::new(),
            product_id,
            combination_id,
            status: StockEntryStatus::Imported,
            remaining_quantity,
            imported_at,
        }
    }

    pub fn id_typed(&self) -> StockEntryId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn combination_id(&self) -> Option<CombinationId> {
        self.combination_id
    }

    pub fn status(&self) -> StockEntryStatus {
        self.status
    }

    pub fn remaining_quantity(&self) -> u64 {
        self.remaining_quantity
    }

    pub fn imported_at(&self) -> DateTime<Utc> {
        self.imported_at
    }

    /// Whether this batch still contributes sellable stock.
    pub fn is_sellable(&self) -> bool {
        self.status == StockEntryStatus::Imported && self.remaining_quantity > 0
    }
}

impl Entity for StockEntry {
    type Id = StockEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imported_batch_with_quantity_is_sellable() {
        let entry = StockEntry::imported(ProductId::new(), None, 10, Utc::now());
        assert!(entry.is_sellable());
        assert_eq!(entry.status(), StockEntryStatus::Imported);
    }

    #[test]
    fn drained_batch_is_not_sellable() {
        let entry = StockEntry::imported(ProductId::new(), Some(CombinationId::new()), 0, Utc::now());
        assert!(!entry.is_sellable());
    }
}
