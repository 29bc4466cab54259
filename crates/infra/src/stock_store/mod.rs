//! Read-only stock entry lookups consumed by the catalog.
//!
//! Stock entries are owned by the warehouse import workflow; the mutation
//! gateway only needs existence answers to decide whether variant structures
//! are locked. Both queries must resolve before a mutation is accepted or
//! rejected.

pub mod in_memory;
pub mod postgres;

use std::collections::HashSet;
use std::sync::Arc;

use brickstore_core::{CombinationId, ProductId};

use crate::document_store::StoreError;

pub use in_memory::InMemoryStockEntryStore;
pub use postgres::PostgresStockEntryStore;

/// Existence/distinct lookups over the stock entry collection.
pub trait StockEntryQueries: Send + Sync {
    /// Whether any stock entry exists for the product, bound to a
    /// combination or not.
    fn has_entries_for_product(&self, product_id: ProductId) -> Result<bool, StoreError>;

    /// The distinct combination ids that at least one stock entry of this
    /// product references.
    fn locked_combination_ids(
        &self,
        product_id: ProductId,
    ) -> Result<HashSet<CombinationId>, StoreError>;
}

impl<Q> StockEntryQueries for Arc<Q>
where
    Q: StockEntryQueries + ?Sized,
{
    fn has_entries_for_product(&self, product_id: ProductId) -> Result<bool, StoreError> {
        (**self).has_entries_for_product(product_id)
    }

    fn locked_combination_ids(
        &self,
        product_id: ProductId,
    ) -> Result<HashSet<CombinationId>, StoreError> {
        (**self).locked_combination_ids(product_id)
    }
}
