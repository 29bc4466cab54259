use std::sync::Arc;

use thiserror::Error;

use brickstore_catalog::Product;
use brickstore_core::{ExpectedVersion, ProductId};

/// Document store operation error.
///
/// These are **infrastructure errors** (storage, concurrency, serialization)
/// as opposed to domain errors (validation, conflicts). Everything except
/// `Concurrency` surfaces to callers as a generic internal failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("document serialization failed: {0}")]
    Serialization(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Whole-document persistence for the product aggregate.
///
/// One document per product; a save replaces the entire document atomically.
/// Implementations must:
/// - enforce optimistic concurrency: `save` compares the stored revision
///   against `expected` and bumps it by one on success
/// - keep `load` free of side effects
/// - treat `delete` of an absent document as a no-op
pub trait ProductStore: Send + Sync {
    /// Load a product by id. `None` if no document exists.
    fn load(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Persist the whole aggregate. Returns the new revision.
    fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<u64, StoreError>;

    /// Remove the document. Absent documents are ignored.
    fn delete(&self, id: ProductId) -> Result<(), StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn load(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).load(id)
    }

    fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<u64, StoreError> {
        (**self).save(product, expected)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete(id)
    }
}
