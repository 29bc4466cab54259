//! `brickstore-stock` — stock entry collaborator model.
//!
//! Stock entries are owned by the warehouse/import workflow; the catalog only
//! queries them to decide whether variant structures are locked.

pub mod entry;

pub use entry::{StockEntry, StockEntryStatus};
