//! `brickstore-catalog` — the product aggregate and its variant machinery.
//!
//! A product optionally exposes named variant axes (e.g. "Color" with options
//! Red/Blue) and combinations of option values across axes, each carrying its
//! own price, stock and images. This crate owns every consistency rule over
//! that structure: uniqueness of names/keys/pair-sets, the freeze rules once
//! combinations exist, cascade removal of emptied axes, and the derived lock
//! annotations served back to the admin UI.
//!
//! Everything here is pure: no IO, no clock, no filesystem. Collaborator
//! lookups (stock entries) and side effects (image files) are resolved by the
//! mutation gateway in `brickstore-infra` before/after calling in.

pub mod combination;
pub mod product;
pub mod variant;
pub mod view;

pub use combination::{Selection, VariantCombination};
pub use product::{NewProduct, OptionRemoval, Product, ProductEdit};
pub use variant::Variant;
pub use view::{CombinationView, OptionView, VariantListing, VariantView};
