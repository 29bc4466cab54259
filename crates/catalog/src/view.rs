//! Lock resolution and the annotated read views served to the admin UI.
//!
//! Locks are derived, never persisted: every listing is rebuilt from the
//! current aggregate plus the set of combination ids that stock entries
//! reference. Rebuilding after each mutation keeps the annotations in step
//! with the state that was just written.

use std::collections::HashSet;

use serde::Serialize;

use brickstore_core::{CombinationId, VariantId};

use crate::combination::Selection;
use crate::product::Product;

/// An option value plus whether some combination currently uses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub value: String,
    pub is_locked: bool,
}

/// A variant axis annotated with lock flags.
///
/// The axis-level flag is coarse: it trips as soon as the product has any
/// combination at all, not only when this axis is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
    pub id: VariantId,
    pub name: String,
    pub is_locked: bool,
    pub options: Vec<OptionView>,
}

/// A combination annotated with its stock lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationView {
    pub id: CombinationId,
    pub variant_key: String,
    pub selections: Vec<Selection>,
    pub price: u64,
    pub stock: u64,
    pub images: Vec<String>,
    pub is_locked: bool,
}

/// The full variants + combinations listing for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantListing {
    pub variants: Vec<VariantView>,
    pub combinations: Vec<CombinationView>,
}

/// Whether `value` on the given axis is locked by a combination.
pub fn option_locked(product: &Product, variant_id: VariantId, value: &str) -> bool {
    product.option_in_use(variant_id, value)
}

/// Whether the product's axes are structurally frozen.
pub fn variant_locked(product: &Product) -> bool {
    product.combination_count() > 0
}

impl VariantListing {
    /// Build the annotated listing. `stock_locked` is the set of combination
    /// ids that at least one stock entry references.
    pub fn build(product: &Product, stock_locked: &HashSet<CombinationId>) -> Self {
        let axes_locked = variant_locked(product);

        let variants = product
            .variants()
            .map(|variant| VariantView {
                id: variant.id_typed(),
                name: variant.name().to_string(),
                is_locked: axes_locked,
                options: variant
                    .options()
                    .iter()
                    .map(|value| OptionView {
                        value: value.clone(),
                        is_locked: option_locked(product, variant.id_typed(), value),
                    })
                    .collect(),
            })
            .collect();

        let combinations = product
            .combinations()
            .map(|combo| CombinationView {
                id: combo.id_typed(),
                variant_key: combo.variant_key().to_string(),
                selections: combo.selections().to_vec(),
                price: combo.price(),
                stock: combo.stock(),
                images: combo.images().to_vec(),
                is_locked: stock_locked.contains(&combo.id_typed()),
            })
            .collect();

        Self {
            variants,
            combinations,
        }
    }
}
