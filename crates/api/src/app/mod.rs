//! HTTP API application wiring (Axum router + service wiring).
//!
//! Folder layout:
//! - `routes/`: HTTP routes + handlers (one file per resource area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use brickstore_infra::{CatalogGateway, FileStore, ProductStore, StockEntryQueries};

pub mod dto;
pub mod errors;
pub mod routes;

pub type DynProductStore = Arc<dyn ProductStore>;
pub type DynStockQueries = Arc<dyn StockEntryQueries>;
pub type DynFileStore = Arc<dyn FileStore>;

/// The gateway as wired into the router: trait objects so prod and tests can
/// mix storage backends freely.
pub type AppGateway = CatalogGateway<DynProductStore, DynStockQueries, DynFileStore>;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(
    products: DynProductStore,
    stock: DynStockQueries,
    files: DynFileStore,
) -> Router {
    let gateway = Arc::new(AppGateway::new(products, stock, files));

    let admin = routes::products::router()
        .merge(routes::variants::router())
        .merge(routes::combinations::router());

    Router::new()
        .route("/health", get(routes::health))
        .nest("/api/admin/products", admin)
        .layer(Extension(gateway))
}
