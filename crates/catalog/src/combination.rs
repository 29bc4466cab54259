use serde::{Deserialize, Serialize};

use brickstore_core::{CombinationId, Entity, VariantId};

use crate::variant::ci_eq;

/// One axis selection inside a combination: which variant, which option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub variant_id: VariantId,
    pub value: String,
}

/// A sellable combination of option values across a product's variant axes,
/// carrying its own price, stock counter and image set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCombination {
    id: CombinationId,
    variant_key: String,
    selections: Vec<Selection>,
    price: u64,
    stock: u64,
    images: Vec<String>,
}

impl VariantCombination {
    /// New combinations always start with zero stock; stock arrives later
    /// through warehouse imports.
    pub(crate) fn new(variant_key: String, selections: Vec<Selection>, images: Vec<String>) -> Self {
        Self {
            id: CombinationId::new(),
            variant_key,
            selections,
            price: 0,
            stock: 0,
            images,
        }
    }

    pub fn id_typed(&self) -> CombinationId {
        self.id
    }

    pub fn variant_key(&self) -> &str {
        &self.variant_key
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Whether this combination selects exactly the same (variant, value)
    /// pairs as `selections`, in any order. Values compare exactly; they are
    /// validated against the axis' stored option strings on the way in.
    pub fn pair_set_matches(&self, selections: &[Selection]) -> bool {
        if self.selections.len() != selections.len() {
            return false;
        }
        selections.iter().all(|s| {
            self.selections
                .iter()
                .any(|own| own.variant_id == s.variant_id && own.value == s.value)
        })
    }

    /// Whether this combination uses `value` on the given axis. Lock checks
    /// are tolerant of case/whitespace differences.
    pub fn references_option(&self, variant_id: VariantId, value: &str) -> bool {
        self.selections
            .iter()
            .any(|s| s.variant_id == variant_id && ci_eq(&s.value, value))
    }

    pub(crate) fn set_variant_key(&mut self, key: String) {
        self.variant_key = key;
    }

    pub(crate) fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }

    pub(crate) fn set_price(&mut self, price: u64) {
        self.price = price;
    }

    pub(crate) fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
    }
}

impl Entity for VariantCombination {
    type Id = CombinationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(variant_id: VariantId, value: &str) -> Selection {
        Selection {
            variant_id,
            value: value.to_string(),
        }
    }

    #[test]
    fn pair_set_match_is_order_insensitive() {
        let color = VariantId::new();
        let size = VariantId::new();
        let combo = VariantCombination::new(
            "Red / L".to_string(),
            vec![selection(color, "Red"), selection(size, "L")],
            vec![],
        );

        assert!(combo.pair_set_matches(&[selection(size, "L"), selection(color, "Red")]));
        assert!(!combo.pair_set_matches(&[selection(color, "Red")]));
        assert!(!combo.pair_set_matches(&[selection(color, "Blue"), selection(size, "L")]));
    }

    #[test]
    fn option_reference_check_is_case_insensitive() {
        let color = VariantId::new();
        let combo =
            VariantCombination::new("Red".to_string(), vec![selection(color, "Red")], vec![]);

        assert!(combo.references_option(color, " red "));
        assert!(!combo.references_option(color, "Blue"));
        assert!(!combo.references_option(VariantId::new(), "Red"));
    }

    #[test]
    fn new_combination_starts_with_zero_stock() {
        let combo = VariantCombination::new("Red".to_string(), vec![], vec![]);
        assert_eq!(combo.stock(), 0);
        assert_eq!(combo.price(), 0);
    }
}
