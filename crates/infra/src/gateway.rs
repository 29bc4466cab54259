//! Mutation gateway: the single entry point for catalog edits.
//!
//! Every operation follows the same unit of work:
//!
//! ```text
//! load aggregate
//!   ↓
//! validate + mutate in memory (pure, rejected calls change nothing)
//!   ↓
//! save whole document (compare-and-swap on the revision)
//!   ↓
//! perform file effects (best-effort, failures logged)
//!   ↓
//! rebuild the annotated listing from post-mutation state
//! ```
//!
//! Stock lookups resolve before the accept/reject decision. Ambient request
//! state (actor identity, uploaded files) arrives as an explicit
//! [`OperationContext`] rather than being read from thread-locals or
//! request globals.

use chrono::Utc;
use tracing::{info, warn};

use brickstore_catalog::{
    NewProduct, Product, ProductEdit, Selection, VariantListing,
};
use brickstore_core::{
    AggregateRoot, CombinationId, DomainError, ExpectedVersion, ProductId, UserId, VariantId,
};

use crate::document_store::{ProductStore, StoreError};
use crate::file_store::{FileStore, FileUpload};
use crate::stock_store::StockEntryQueries;

/// Gateway operation error.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Malformed or missing input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The product (or a variant/combination/option within it) is absent.
    #[error("not found")]
    NotFound,

    /// An invariant or concurrency check rejected the mutation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persisting an upload failed.
    #[error("file storage failed: {0}")]
    Upload(String),

    /// The storage backend misbehaved; surfaces as an internal failure.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<DomainError> for GatewayError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => GatewayError::Validation(msg),
            DomainError::InvalidId(msg) => GatewayError::InvalidId(msg),
            DomainError::NotFound => GatewayError::NotFound,
            DomainError::Conflict(msg) => GatewayError::Conflict(msg),
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(msg) => GatewayError::Conflict(msg),
            other => GatewayError::Store(other),
        }
    }
}

/// Explicit per-request context: who is acting, and which files they
/// uploaded alongside the request body.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    caller: Option<UserId>,
    uploads: Vec<FileUpload>,
}

impl OperationContext {
    pub fn new(caller: UserId) -> Self {
        Self {
            caller: Some(caller),
            uploads: Vec::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_uploads(mut self, uploads: Vec<FileUpload>) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn caller(&self) -> Option<UserId> {
        self.caller
    }

    pub fn uploads(&self) -> &[FileUpload] {
        &self.uploads
    }
}

/// A single product plus the stock flag the edit form needs.
#[derive(Debug, Clone)]
pub struct ProductDetails {
    pub product: Product,
    pub has_stock_entries: bool,
}

/// The mutation gateway. Generic over its three collaborators so tests can
/// run fully in memory and production can mix backends freely.
#[derive(Debug)]
pub struct CatalogGateway<S, Q, F> {
    products: S,
    stock: Q,
    files: F,
}

impl<S, Q, F> CatalogGateway<S, Q, F> {
    pub fn new(products: S, stock: Q, files: F) -> Self {
        Self {
            products,
            stock,
            files,
        }
    }
}

impl<S, Q, F> CatalogGateway<S, Q, F>
where
    S: ProductStore,
    Q: StockEntryQueries,
    F: FileStore,
{
    fn load(&self, id: ProductId) -> Result<Product, GatewayError> {
        self.products.load(id)?.ok_or(GatewayError::NotFound)
    }

    /// Save under the revision observed at load time, then rebuild the
    /// annotated listing from what was just written.
    fn persist_and_rebuild(&self, product: &mut Product) -> Result<VariantListing, GatewayError> {
        let expected = ExpectedVersion::Exact(product.revision());
        let revision = self.products.save(product, expected)?;
        product.set_revision(revision);
        self.rebuild_listing(product)
    }

    fn rebuild_listing(&self, product: &Product) -> Result<VariantListing, GatewayError> {
        let locked = self.stock.locked_combination_ids(product.id_typed())?;
        Ok(VariantListing::build(product, &locked))
    }

    fn store_uploads(&self, ctx: &OperationContext) -> Result<Vec<String>, GatewayError> {
        let mut paths = Vec::with_capacity(ctx.uploads().len());
        for upload in ctx.uploads() {
            let path = self
                .files
                .store(upload)
                .map_err(|e| GatewayError::Upload(e.to_string()))?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Delete stored files, swallowing failures. Orphaned files on disk are
    /// tolerated; a blocked mutation is not.
    fn discard_images(&self, paths: &[String]) {
        for path in paths {
            if let Err(e) = self.files.delete(path) {
                warn!(path = %path, error = %e, "failed to delete stale image");
            }
        }
    }

    // ------------------------------------------------------------------
    // Product lifecycle
    // ------------------------------------------------------------------

    pub fn create_product(
        &self,
        ctx: &OperationContext,
        input: NewProduct,
    ) -> Result<Product, GatewayError> {
        let images = self.store_uploads(ctx)?;
        let mut product = Product::create(input, images, Utc::now())?;
        let revision = self.products.save(&product, ExpectedVersion::Exact(0))?;
        product.set_revision(revision);
        info!(product_id = %product.id_typed(), caller = ?ctx.caller(), "product created");
        Ok(product)
    }

    pub fn get_product(&self, id: ProductId) -> Result<ProductDetails, GatewayError> {
        let product = self.load(id)?;
        let has_stock_entries = self.stock.has_entries_for_product(id)?;
        Ok(ProductDetails {
            product,
            has_stock_entries,
        })
    }

    pub fn edit_product(
        &self,
        ctx: &OperationContext,
        id: ProductId,
        edit: ProductEdit,
    ) -> Result<Product, GatewayError> {
        let mut product = self.load(id)?;
        // With variant support on, product-level images are purged rather
        // than replaced, so fresh uploads would only become orphans.
        let new_images = if edit.has_variants {
            Vec::new()
        } else {
            self.store_uploads(ctx)?
        };

        let detached = product.apply_edit(edit, new_images)?;
        product.touch(Utc::now());
        let revision = self
            .products
            .save(&product, ExpectedVersion::Exact(product.revision()))?;
        product.set_revision(revision);
        self.discard_images(&detached);
        Ok(product)
    }

    pub fn delete_product(&self, ctx: &OperationContext, id: ProductId) -> Result<(), GatewayError> {
        let product = self.load(id)?;
        self.products.delete(id)?;
        self.discard_images(product.images());
        info!(product_id = %id, caller = ?ctx.caller(), "product deleted");
        Ok(())
    }

    pub fn toggle_active(&self, _ctx: &OperationContext, id: ProductId) -> Result<bool, GatewayError> {
        let mut product = self.load(id)?;
        let is_active = product.toggle_active()?;
        product.touch(Utc::now());
        self.products
            .save(&product, ExpectedVersion::Exact(product.revision()))?;
        Ok(is_active)
    }

    pub fn toggle_has_variants(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
    ) -> Result<bool, GatewayError> {
        let mut product = self.load(id)?;
        let has_variants = product.toggle_has_variants()?;
        if self.stock.has_entries_for_product(id)? {
            return Err(GatewayError::Conflict(
                "stock entries exist for this product".to_string(),
            ));
        }
        product.touch(Utc::now());
        self.products
            .save(&product, ExpectedVersion::Exact(product.revision()))?;
        Ok(has_variants)
    }

    // ------------------------------------------------------------------
    // Variant axes
    // ------------------------------------------------------------------

    pub fn get_variants(&self, id: ProductId) -> Result<VariantListing, GatewayError> {
        let product = self.load(id)?;
        if !product.has_variants() {
            return Ok(VariantListing::default());
        }
        self.rebuild_listing(&product)
    }

    pub fn add_variant(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
        name: &str,
        options: &[String],
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        product.add_variant(name, options)?;
        product.touch(Utc::now());
        self.persist_and_rebuild(&mut product)
    }

    pub fn rename_variant(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
        variant_id: VariantId,
        name: &str,
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        product.rename_variant(variant_id, name)?;
        product.touch(Utc::now());
        self.persist_and_rebuild(&mut product)
    }

    pub fn add_variant_option(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
        variant_id: VariantId,
        value: &str,
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        product.add_option(variant_id, value)?;
        product.touch(Utc::now());
        self.persist_and_rebuild(&mut product)
    }

    pub fn update_variant_option(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
        variant_id: VariantId,
        old_value: &str,
        new_value: &str,
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        product.update_option(variant_id, old_value, new_value)?;
        product.touch(Utc::now());
        self.persist_and_rebuild(&mut product)
    }

    pub fn delete_variant_option(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
        variant_id: VariantId,
        value: &str,
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        product.remove_option(variant_id, value)?;
        product.touch(Utc::now());
        self.persist_and_rebuild(&mut product)
    }

    // ------------------------------------------------------------------
    // Combinations
    // ------------------------------------------------------------------

    pub fn add_combination(
        &self,
        ctx: &OperationContext,
        id: ProductId,
        variant_key: &str,
        selections: Vec<Selection>,
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        let images = self.store_uploads(ctx)?;
        product.add_combination(variant_key, selections, images)?;
        product.touch(Utc::now());
        self.persist_and_rebuild(&mut product)
    }

    pub fn update_combination(
        &self,
        ctx: &OperationContext,
        id: ProductId,
        combo_id: CombinationId,
        variant_key: &str,
        selections: Vec<Selection>,
        deleted_images: &[String],
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        let new_images = self.store_uploads(ctx)?;
        let removed =
            product.update_combination(combo_id, variant_key, selections, deleted_images, new_images)?;
        product.touch(Utc::now());
        let listing = self.persist_and_rebuild(&mut product)?;
        self.discard_images(&removed);
        Ok(listing)
    }

    pub fn update_combination_price(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
        combo_id: CombinationId,
        price: f64,
    ) -> Result<VariantListing, GatewayError> {
        if !price.is_finite() || price < 0.0 {
            return Err(GatewayError::Validation("invalid price".to_string()));
        }
        let mut product = self.load(id)?;
        product.set_combination_price(combo_id, price.round() as u64)?;
        product.touch(Utc::now());
        self.persist_and_rebuild(&mut product)
    }

    pub fn delete_combination(
        &self,
        _ctx: &OperationContext,
        id: ProductId,
        combo_id: CombinationId,
    ) -> Result<VariantListing, GatewayError> {
        let mut product = self.load(id)?;
        let images = product.remove_combination(combo_id)?;
        product.touch(Utc::now());
        let listing = self.persist_and_rebuild(&mut product)?;
        self.discard_images(&images);
        Ok(listing)
    }
}
