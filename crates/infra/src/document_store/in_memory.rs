use std::collections::HashMap;
use std::sync::RwLock;

use brickstore_catalog::Product;
use brickstore_core::{AggregateRoot, ExpectedVersion, ProductId};

use super::r#trait::{ProductStore, StoreError};

/// In-memory product document store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    documents: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for InMemoryProductStore {
    fn load(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(documents.get(&id).cloned())
    }

    fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<u64, StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let current = documents
            .get(&product.id_typed())
            .map(|p| p.revision())
            .unwrap_or(0);
        if !expected.matches(current) {
            return Err(StoreError::Concurrency(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        let next = current + 1;
        let mut stored = product.clone();
        stored.set_revision(next);
        documents.insert(product.id_typed(), stored);
        Ok(next)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        documents.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickstore_core::{BrandId, CategoryId};
    use chrono::Utc;

    use brickstore_catalog::NewProduct;

    fn sample_product() -> Product {
        Product::create(
            NewProduct {
                name: "Classic Castle".to_string(),
                price: Some(49_000),
                category_id: CategoryId::new(),
                brand_id: BrandId::new(),
                product_info: String::new(),
                usage: String::new(),
                has_variants: false,
            },
            vec![],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn save_bumps_revision_and_load_round_trips() {
        let store = InMemoryProductStore::new();
        let product = sample_product();

        let rev = store.save(&product, ExpectedVersion::Exact(0)).unwrap();
        assert_eq!(rev, 1);

        let loaded = store.load(product.id_typed()).unwrap().unwrap();
        assert_eq!(loaded.revision(), 1);
        assert_eq!(loaded.name(), "Classic Castle");
    }

    #[test]
    fn stale_revision_is_rejected() {
        let store = InMemoryProductStore::new();
        let product = sample_product();
        store.save(&product, ExpectedVersion::Exact(0)).unwrap();

        // A second writer still holding revision 0 loses.
        let err = store.save(&product, ExpectedVersion::Exact(0)).unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));

        // `Any` skips the check.
        store.save(&product, ExpectedVersion::Any).unwrap();
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryProductStore::new();
        let product = sample_product();
        store.save(&product, ExpectedVersion::Any).unwrap();

        store.delete(product.id_typed()).unwrap();
        store.delete(product.id_typed()).unwrap();
        assert!(store.load(product.id_typed()).unwrap().is_none());
    }
}
