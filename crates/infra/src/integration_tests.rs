//! Integration tests for the full mutation pipeline.
//!
//! Gateway → document store → stock queries → file store, all in memory.

use std::sync::Arc;

use chrono::Utc;

use brickstore_catalog::{NewProduct, ProductEdit, Selection};
use brickstore_core::{BrandId, CategoryId, ProductId, VariantId};
use brickstore_stock::StockEntry;

use crate::document_store::InMemoryProductStore;
use crate::file_store::in_memory::{FailingDeleteFileStore, InMemoryFileStore};
use crate::file_store::FileUpload;
use crate::gateway::{CatalogGateway, GatewayError, OperationContext};
use crate::stock_store::InMemoryStockEntryStore;

type TestGateway<F> = CatalogGateway<Arc<InMemoryProductStore>, Arc<InMemoryStockEntryStore>, Arc<F>>;

fn setup() -> (
    TestGateway<InMemoryFileStore>,
    Arc<InMemoryStockEntryStore>,
    Arc<InMemoryFileStore>,
) {
    let products = Arc::new(InMemoryProductStore::new());
    let stock = Arc::new(InMemoryStockEntryStore::new());
    let files = Arc::new(InMemoryFileStore::new());
    let gateway = CatalogGateway::new(products, stock.clone(), files.clone());
    (gateway, stock, files)
}

fn ctx() -> OperationContext {
    OperationContext::anonymous()
}

fn new_product(has_variants: bool) -> NewProduct {
    NewProduct {
        name: "Classic Castle".to_string(),
        price: Some(49_000),
        category_id: CategoryId::new(),
        brand_id: BrandId::new(),
        product_info: String::new(),
        usage: String::new(),
        has_variants,
    }
}

fn selection(variant_id: VariantId, value: &str) -> Selection {
    Selection {
        variant_id,
        value: value.to_string(),
    }
}

fn upload(name: &str) -> FileUpload {
    FileUpload {
        filename: name.to_string(),
        content: vec![0xFF, 0xD8],
    }
}

#[test]
fn duplicate_pair_set_is_rejected_end_to_end() {
    let (gateway, _stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into(), "Blue".into()])
        .unwrap();
    let color = listing.variants[0].id;

    let listing = gateway
        .add_combination(&ctx(), id, "Red", vec![selection(color, "Red")])
        .unwrap();
    assert_eq!(listing.combinations.len(), 1);
    assert_eq!(listing.combinations[0].stock, 0);

    // Same pair-set under a different key is still a conflict.
    let err = gateway
        .add_combination(&ctx(), id, "Red-2", vec![selection(color, "Red")])
        .unwrap_err();
    assert!(matches!(err, GatewayError::Conflict(_)));
}

#[test]
fn locked_option_frees_up_when_the_combination_goes() {
    let (gateway, _stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into(), "Blue".into()])
        .unwrap();
    let color = listing.variants[0].id;
    let listing = gateway
        .add_combination(&ctx(), id, "Red", vec![selection(color, "Red")])
        .unwrap();
    let combo = listing.combinations[0].id;

    let err = gateway
        .delete_variant_option(&ctx(), id, color, "Red")
        .unwrap_err();
    assert!(matches!(err, GatewayError::Conflict(_)));

    gateway.delete_combination(&ctx(), id, combo).unwrap();

    // Blue remains, so the axis survives this removal...
    let listing = gateway
        .delete_variant_option(&ctx(), id, color, "Red")
        .unwrap();
    assert_eq!(listing.variants.len(), 1);
    assert_eq!(listing.variants[0].options.len(), 1);

    // ...and vanishes with its last option.
    let listing = gateway
        .delete_variant_option(&ctx(), id, color, "Blue")
        .unwrap();
    assert!(listing.variants.is_empty());
}

#[test]
fn combination_price_updates_reject_bad_values_and_stick() {
    let (gateway, _stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into()])
        .unwrap();
    let color = listing.variants[0].id;
    let listing = gateway
        .add_combination(&ctx(), id, "Red", vec![selection(color, "Red")])
        .unwrap();
    let combo = listing.combinations[0].id;

    let err = gateway
        .update_combination_price(&ctx(), id, combo, -5.0)
        .unwrap_err();
    assert!(matches!(err, GatewayError::Validation(_)));
    let err = gateway
        .update_combination_price(&ctx(), id, combo, f64::NAN)
        .unwrap_err();
    assert!(matches!(err, GatewayError::Validation(_)));

    gateway
        .update_combination_price(&ctx(), id, combo, 99_000.0)
        .unwrap();
    let listing = gateway.get_variants(id).unwrap();
    assert_eq!(listing.combinations[0].price, 99_000);
}

#[test]
fn stock_entries_block_the_variant_mode_toggle() {
    let (gateway, stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(false)).unwrap();
    let id = product.id_typed();

    stock.insert(StockEntry::imported(id, None, 5, Utc::now()));

    let err = gateway.toggle_has_variants(&ctx(), id).unwrap_err();
    assert!(matches!(err, GatewayError::Conflict(_)));
}

#[test]
fn variant_data_blocks_the_variant_mode_toggle() {
    let (gateway, _stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    gateway
        .add_variant(&ctx(), id, "Color", &["Red".into()])
        .unwrap();

    let err = gateway.toggle_has_variants(&ctx(), id).unwrap_err();
    assert!(matches!(err, GatewayError::Conflict(_)));
}

#[test]
fn empty_products_can_flip_variant_mode_both_ways() {
    let (gateway, _stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(false)).unwrap();
    let id = product.id_typed();

    assert!(gateway.toggle_has_variants(&ctx(), id).unwrap());
    assert!(!gateway.toggle_has_variants(&ctx(), id).unwrap());
}

#[test]
fn activation_needs_a_variant_and_a_combination() {
    let (gateway, _stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let err = gateway.toggle_active(&ctx(), id).unwrap_err();
    assert!(matches!(err, GatewayError::Conflict(_)));

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into()])
        .unwrap();
    let color = listing.variants[0].id;
    let err = gateway.toggle_active(&ctx(), id).unwrap_err();
    assert!(matches!(err, GatewayError::Conflict(_)));

    gateway
        .add_combination(&ctx(), id, "Red", vec![selection(color, "Red")])
        .unwrap();
    assert!(gateway.toggle_active(&ctx(), id).unwrap());
}

#[test]
fn stock_entries_lock_their_combination_in_the_listing() {
    let (gateway, stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into(), "Blue".into()])
        .unwrap();
    let color = listing.variants[0].id;
    let listing = gateway
        .add_combination(&ctx(), id, "Red", vec![selection(color, "Red")])
        .unwrap();
    let combo = listing.combinations[0].id;
    assert!(!listing.combinations[0].is_locked);

    stock.insert(StockEntry::imported(id, Some(combo), 5, Utc::now()));

    let listing = gateway.get_variants(id).unwrap();
    assert!(listing.combinations[0].is_locked);

    // Reading again without mutation yields identical annotations.
    assert_eq!(listing, gateway.get_variants(id).unwrap());
}

#[test]
fn products_without_variant_mode_list_nothing() {
    let (gateway, _stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(false)).unwrap();

    let listing = gateway.get_variants(product.id_typed()).unwrap();
    assert!(listing.variants.is_empty());
    assert!(listing.combinations.is_empty());
}

#[test]
fn uploads_attach_to_combinations_and_are_deleted_with_them() {
    let (gateway, _stock, files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into()])
        .unwrap();
    let color = listing.variants[0].id;

    let upload_ctx = OperationContext::anonymous().with_uploads(vec![upload("red.jpg")]);
    let listing = gateway
        .add_combination(&upload_ctx, id, "Red", vec![selection(color, "Red")])
        .unwrap();
    let combo = listing.combinations[0].id;
    let image = listing.combinations[0].images[0].clone();
    assert!(files.contains(&image));

    gateway.delete_combination(&ctx(), id, combo).unwrap();
    assert!(!files.contains(&image));
}

#[test]
fn update_combination_swaps_images() {
    let (gateway, _stock, files) = setup();
    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into()])
        .unwrap();
    let color = listing.variants[0].id;

    let upload_ctx = OperationContext::anonymous().with_uploads(vec![upload("old.jpg")]);
    let listing = gateway
        .add_combination(&upload_ctx, id, "Red", vec![selection(color, "Red")])
        .unwrap();
    let combo = listing.combinations[0].id;
    let old_image = listing.combinations[0].images[0].clone();

    let upload_ctx = OperationContext::anonymous().with_uploads(vec![upload("new.jpg")]);
    let listing = gateway
        .update_combination(
            &upload_ctx,
            id,
            combo,
            "Red",
            vec![selection(color, "Red")],
            &[old_image.clone()],
        )
        .unwrap();

    assert_eq!(listing.combinations[0].images.len(), 1);
    assert_ne!(listing.combinations[0].images[0], old_image);
    assert!(!files.contains(&old_image));
    assert!(files.contains(&listing.combinations[0].images[0]));
}

#[test]
fn failed_image_deletion_does_not_fail_the_operation() {
    let products = Arc::new(InMemoryProductStore::new());
    let stock = Arc::new(InMemoryStockEntryStore::new());
    let files = Arc::new(FailingDeleteFileStore::new());
    let gateway = CatalogGateway::new(products, stock, files.clone());

    let product = gateway.create_product(&ctx(), new_product(true)).unwrap();
    let id = product.id_typed();

    let listing = gateway
        .add_variant(&ctx(), id, "Color", &["Red".into()])
        .unwrap();
    let color = listing.variants[0].id;

    let upload_ctx = OperationContext::anonymous().with_uploads(vec![upload("red.jpg")]);
    let listing = gateway
        .add_combination(&upload_ctx, id, "Red", vec![selection(color, "Red")])
        .unwrap();
    let combo = listing.combinations[0].id;
    let image = listing.combinations[0].images[0].clone();

    // Deletion fails on disk, yet the combination is gone from the document.
    let listing = gateway.delete_combination(&ctx(), id, combo).unwrap();
    assert!(listing.combinations.is_empty());
    assert!(files.contains(&image));
}

#[test]
fn deleting_a_product_discards_its_images() {
    let (gateway, _stock, files) = setup();
    let upload_ctx = OperationContext::anonymous().with_uploads(vec![upload("box.jpg")]);
    let product = gateway
        .create_product(&upload_ctx, new_product(false))
        .unwrap();
    let image = product.images()[0].clone();
    assert!(files.contains(&image));

    gateway.delete_product(&ctx(), product.id_typed()).unwrap();
    assert!(!files.contains(&image));
    assert!(matches!(
        gateway.get_product(product.id_typed()).unwrap_err(),
        GatewayError::NotFound
    ));
}

#[test]
fn turning_variants_on_purges_product_level_images() {
    let (gateway, _stock, files) = setup();
    let upload_ctx = OperationContext::anonymous().with_uploads(vec![upload("box.jpg")]);
    let product = gateway
        .create_product(&upload_ctx, new_product(false))
        .unwrap();
    let id = product.id_typed();
    let image = product.images()[0].clone();

    let edited = gateway
        .edit_product(
            &ctx(),
            id,
            ProductEdit {
                name: "Classic Castle".to_string(),
                price: Some(49_000),
                category_id: product.category_id(),
                brand_id: product.brand_id(),
                product_info: String::new(),
                usage: String::new(),
                has_variants: true,
            },
        )
        .unwrap();

    assert!(edited.has_variants());
    assert!(edited.images().is_empty());
    assert_eq!(edited.price(), 0);
    assert!(!files.contains(&image));
}

#[test]
fn get_product_reports_stock_presence() {
    let (gateway, stock, _files) = setup();
    let product = gateway.create_product(&ctx(), new_product(false)).unwrap();
    let id = product.id_typed();

    assert!(!gateway.get_product(id).unwrap().has_stock_entries);
    stock.insert(StockEntry::imported(id, None, 2, Utc::now()));
    assert!(gateway.get_product(id).unwrap().has_stock_entries);
}

#[test]
fn missing_products_surface_as_not_found() {
    let (gateway, _stock, _files) = setup();
    let missing = ProductId::new();

    assert!(matches!(
        gateway.get_variants(missing).unwrap_err(),
        GatewayError::NotFound
    ));
    assert!(matches!(
        gateway
            .add_variant(&ctx(), missing, "Color", &["Red".into()])
            .unwrap_err(),
        GatewayError::NotFound
    ));
}
