//! Infrastructure layer: document store, stock queries, file storage and the
//! mutation gateway that composes them.

pub mod document_store;
pub mod file_store;
pub mod gateway;
pub mod stock_store;

#[cfg(test)]
mod integration_tests;

pub use document_store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
pub use file_store::{FileStore, FileStoreError, FileUpload, InMemoryFileStore, LocalFileStore};
pub use gateway::{CatalogGateway, GatewayError, OperationContext, ProductDetails};
pub use stock_store::{InMemoryStockEntryStore, PostgresStockEntryStore, StockEntryQueries};
