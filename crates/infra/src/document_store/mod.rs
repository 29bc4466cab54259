//! Product document store boundary.
//!
//! The catalog persists each product as one whole document (aggregate root +
//! embedded variants/combinations). This module defines the storage
//! abstraction without making backend assumptions; a compare-and-swap
//! revision check guards concurrent edits to the same product.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
