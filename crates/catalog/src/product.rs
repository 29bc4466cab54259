use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use brickstore_core::{
    AggregateRoot, BrandId, CategoryId, CombinationId, DomainError, DomainResult, ProductId,
    VariantId,
};

use crate::combination::{Selection, VariantCombination};
use crate::variant::{ci_eq, Variant};

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Option<u64>,
    pub category_id: CategoryId,
    pub brand_id: BrandId,
    pub product_info: String,
    pub usage: String,
    pub has_variants: bool,
}

/// Input for a full product update, including a `has_variants` flip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEdit {
    pub name: String,
    pub price: Option<u64>,
    pub category_id: CategoryId,
    pub brand_id: BrandId,
    pub product_info: String,
    pub usage: String,
    pub has_variants: bool,
}

/// Outcome of removing an option value from an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRemoval {
    OptionRemoved,
    /// The removed option was the axis' last one; the axis is gone too.
    VariantRemoved,
}

/// Aggregate root: Product.
///
/// The two embedded collections are id-keyed, insertion-ordered maps:
/// creation order doubles as display order in the admin UI, and id lookups
/// stay O(1). All mutation goes through the methods below; every method
/// validates fully before touching any state, so a rejected call leaves the
/// aggregate exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    /// Sale price in the smallest currency unit. Authoritative only while
    /// `has_variants` is false; each combination carries its own price.
    price: u64,
    category_id: CategoryId,
    brand_id: BrandId,
    product_info: String,
    usage: String,
    is_active: bool,
    has_variants: bool,
    /// Storage reference paths. Only meaningful while `has_variants` is
    /// false; variant-level images live on the combinations.
    images: Vec<String>,
    variants: IndexMap<VariantId, Variant>,
    combinations: IndexMap<CombinationId, VariantCombination>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn create(input: NewProduct, images: Vec<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }

        Ok(Self {
            id: ProductId::new(),
            name: name.to_string(),
            price: input.price.unwrap_or(0),
            category_id: input.category_id,
            brand_id: input.brand_id,
            product_info: input.product_info,
            usage: input.usage,
            is_active: false,
            has_variants: input.has_variants,
            images,
            variants: IndexMap::new(),
            combinations: IndexMap::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn brand_id(&self) -> BrandId {
        self.brand_id
    }

    pub fn product_info(&self) -> &str {
        &self.product_info
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn has_variants(&self) -> bool {
        self.has_variants
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.get(&id)
    }

    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values()
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    pub fn combination(&self, id: CombinationId) -> Option<&VariantCombination> {
        self.combinations.get(&id)
    }

    pub fn combinations(&self) -> impl Iterator<Item = &VariantCombination> {
        self.combinations.values()
    }

    pub fn combination_count(&self) -> usize {
        self.combinations.len()
    }

    /// Bump the modification timestamp. Called by the gateway once a mutation
    /// has been accepted, so the domain itself never reads a clock.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Set the persisted revision. Document stores call this after a
    /// successful compare-and-swap write.
    pub fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }

    fn ensure_variant_mode(&self) -> DomainResult<()> {
        if self.has_variants {
            Ok(())
        } else {
            Err(DomainError::conflict(
                "variant support is not enabled for this product",
            ))
        }
    }

    fn ensure_axes_unfrozen(&self) -> DomainResult<()> {
        if self.combinations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::conflict(
                "combinations already exist; variant axes are frozen",
            ))
        }
    }

    /// Whether `value` on the given axis is used by any combination.
    pub fn option_in_use(&self, variant_id: VariantId, value: &str) -> bool {
        self.combinations
            .values()
            .any(|c| c.references_option(variant_id, value))
    }

    // ------------------------------------------------------------------
    // Variant axes
    // ------------------------------------------------------------------

    /// Add a new axis. Option values are trimmed; empty and duplicate values
    /// are dropped.
    pub fn add_variant(&mut self, name: &str, options: &[String]) -> DomainResult<VariantId> {
        self.ensure_variant_mode()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("variant name must not be empty"));
        }
        if options.is_empty() {
            return Err(DomainError::validation(
                "a variant needs at least one option",
            ));
        }
        self.ensure_axes_unfrozen()?;
        if self.variants.values().any(|v| ci_eq(v.name(), name)) {
            return Err(DomainError::validation(format!(
                "variant \"{name}\" already exists"
            )));
        }

        let mut cleaned: Vec<String> = Vec::new();
        for option in options {
            let option = option.trim();
            if option.is_empty() || cleaned.iter().any(|c| ci_eq(c, option)) {
                continue;
            }
            cleaned.push(option.to_string());
        }
        if cleaned.is_empty() {
            return Err(DomainError::validation(
                "a variant needs at least one non-empty option",
            ));
        }

        let variant = Variant::new(name.to_string(), cleaned);
        let id = variant.id_typed();
        self.variants.insert(id, variant);
        Ok(id)
    }

    /// Rename an axis. Blocked the moment any combination exists, even though
    /// adding options to the axis stays allowed.
    pub fn rename_variant(&mut self, variant_id: VariantId, name: &str) -> DomainResult<()> {
        self.ensure_variant_mode()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("variant name must not be empty"));
        }
        self.ensure_axes_unfrozen()?;

        let duplicate = self
            .variants
            .values()
            .any(|v| v.id_typed() != variant_id && ci_eq(v.name(), name));
        let Some(variant) = self.variants.get_mut(&variant_id) else {
            return Err(DomainError::NotFound);
        };
        if duplicate {
            return Err(DomainError::validation(format!(
                "variant name \"{name}\" already exists"
            )));
        }
        variant.rename(name.to_string());
        Ok(())
    }

    /// Add an option value to an existing axis. Unlike renames, this is not
    /// blocked by existing combinations.
    pub fn add_option(&mut self, variant_id: VariantId, value: &str) -> DomainResult<()> {
        self.ensure_variant_mode()?;
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::validation("option value must not be empty"));
        }
        let Some(variant) = self.variants.get_mut(&variant_id) else {
            return Err(DomainError::NotFound);
        };
        if variant.has_option(value) {
            return Err(DomainError::validation(format!(
                "option \"{value}\" already exists on this variant"
            )));
        }
        variant.push_option(value.to_string());
        Ok(())
    }

    /// Remove an option value from an axis. An option used by a combination
    /// cannot be removed. Removing the last option removes the axis itself.
    pub fn remove_option(
        &mut self,
        variant_id: VariantId,
        value: &str,
    ) -> DomainResult<OptionRemoval> {
        if !self.variants.contains_key(&variant_id) {
            return Err(DomainError::NotFound);
        }
        if self.option_in_use(variant_id, value) {
            return Err(DomainError::conflict(format!(
                "option \"{}\" is used by a combination",
                value.trim()
            )));
        }
        let Some(variant) = self.variants.get_mut(&variant_id) else {
            return Err(DomainError::NotFound);
        };
        let Some(index) = variant.option_index(value) else {
            return Err(DomainError::NotFound);
        };
        variant.remove_option_at(index);

        // Post-condition: an axis with no options left is removed entirely.
        if variant.options().is_empty() {
            self.variants.shift_remove(&variant_id);
            return Ok(OptionRemoval::VariantRemoved);
        }
        Ok(OptionRemoval::OptionRemoved)
    }

    /// Replace an option value on an axis. The old value must exist and must
    /// not be used by a combination; the new value must not collide with any
    /// other option on the axis.
    pub fn update_option(
        &mut self,
        variant_id: VariantId,
        old_value: &str,
        new_value: &str,
    ) -> DomainResult<()> {
        let old = old_value.trim();
        let new = new_value.trim();
        if old.is_empty() || new.is_empty() {
            return Err(DomainError::validation(
                "both the current and the new option value are required",
            ));
        }
        let Some(variant) = self.variants.get(&variant_id) else {
            return Err(DomainError::NotFound);
        };
        let Some(index) = variant.option_index(old) else {
            return Err(DomainError::NotFound);
        };
        if self.option_in_use(variant_id, old) {
            return Err(DomainError::conflict(format!(
                "option \"{old}\" is used by a combination"
            )));
        }
        let Some(variant) = self.variants.get_mut(&variant_id) else {
            return Err(DomainError::NotFound);
        };
        let duplicate = variant
            .options()
            .iter()
            .enumerate()
            .any(|(i, o)| i != index && ci_eq(o, new));
        if duplicate {
            return Err(DomainError::validation(format!(
                "option \"{new}\" already exists on this variant"
            )));
        }
        variant.set_option_at(index, new.to_string());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Combinations
    // ------------------------------------------------------------------

    fn validate_selections(
        &self,
        selections: &[Selection],
        exclude: Option<CombinationId>,
    ) -> DomainResult<()> {
        let mut seen: Vec<VariantId> = Vec::new();
        for selection in selections {
            if selection.value.trim().is_empty() {
                return Err(DomainError::validation(
                    "selection value must not be empty",
                ));
            }
            if seen.contains(&selection.variant_id) {
                return Err(DomainError::validation(
                    "a combination may select at most one value per variant",
                ));
            }
            seen.push(selection.variant_id);

            let Some(variant) = self.variants.get(&selection.variant_id) else {
                return Err(DomainError::validation(format!(
                    "variant {} does not exist",
                    selection.variant_id
                )));
            };
            if !variant.options().iter().any(|o| o == &selection.value) {
                return Err(DomainError::validation(format!(
                    "value \"{}\" does not exist on variant \"{}\"",
                    selection.value,
                    variant.name()
                )));
            }
        }

        // Pair-set uniqueness is independent of key uniqueness: two
        // combinations may never select the same values even under
        // different keys.
        let clash = self
            .combinations
            .values()
            .any(|c| Some(c.id_typed()) != exclude && c.pair_set_matches(selections));
        if clash {
            let described: Vec<String> = selections
                .iter()
                .map(|s| {
                    let axis = self
                        .variants
                        .get(&s.variant_id)
                        .map(|v| v.name())
                        .unwrap_or("?");
                    format!("{axis}: {}", s.value)
                })
                .collect();
            return Err(DomainError::conflict(format!(
                "a combination with ({}) already exists",
                described.join(", ")
            )));
        }
        Ok(())
    }

    /// Add a combination. Starts with zero stock; `images` are storage paths
    /// of freshly uploaded files.
    pub fn add_combination(
        &mut self,
        variant_key: &str,
        selections: Vec<Selection>,
        images: Vec<String>,
    ) -> DomainResult<CombinationId> {
        self.ensure_variant_mode()?;
        let key = variant_key.trim();
        if key.is_empty() {
            return Err(DomainError::validation("combination key must not be empty"));
        }
        if selections.is_empty() {
            return Err(DomainError::validation(
                "a combination needs at least one axis selection",
            ));
        }
        if self.combinations.values().any(|c| ci_eq(c.variant_key(), key)) {
            return Err(DomainError::conflict(format!(
                "combination \"{key}\" already exists"
            )));
        }
        self.validate_selections(&selections, None)?;

        let combination = VariantCombination::new(key.to_string(), selections, images);
        let id = combination.id_typed();
        self.combinations.insert(id, combination);
        Ok(id)
    }

    /// Update a combination's key, selections and image set. Returns the
    /// image paths that were detached so the caller can delete the files.
    /// Paths in `deleted_images` that do not belong to this combination are
    /// skipped silently.
    pub fn update_combination(
        &mut self,
        combo_id: CombinationId,
        variant_key: &str,
        selections: Vec<Selection>,
        deleted_images: &[String],
        new_images: Vec<String>,
    ) -> DomainResult<Vec<String>> {
        if !self.combinations.contains_key(&combo_id) {
            return Err(DomainError::NotFound);
        }
        let key = variant_key.trim();
        if key.is_empty() {
            return Err(DomainError::validation("combination key must not be empty"));
        }
        if selections.is_empty() {
            return Err(DomainError::validation(
                "a combination needs at least one axis selection",
            ));
        }
        if self
            .combinations
            .values()
            .any(|c| c.id_typed() != combo_id && ci_eq(c.variant_key(), key))
        {
            return Err(DomainError::conflict(format!(
                "combination \"{key}\" already exists"
            )));
        }
        self.validate_selections(&selections, Some(combo_id))?;

        let Some(combination) = self.combinations.get(&combo_id) else {
            return Err(DomainError::NotFound);
        };
        let removed: Vec<String> = deleted_images
            .iter()
            .filter(|path| combination.images().iter().any(|img| img == *path))
            .cloned()
            .collect();
        let mut final_images: Vec<String> = combination
            .images()
            .iter()
            .filter(|img| !removed.contains(img))
            .cloned()
            .collect();
        final_images.extend(new_images);

        let Some(combination) = self.combinations.get_mut(&combo_id) else {
            return Err(DomainError::NotFound);
        };
        combination.set_variant_key(key.to_string());
        combination.set_selections(selections);
        combination.set_images(final_images);
        Ok(removed)
    }

    /// Price changes are allowed even for combinations locked by stock
    /// entries; only structural edits are guarded.
    pub fn set_combination_price(
        &mut self,
        combo_id: CombinationId,
        price: u64,
    ) -> DomainResult<()> {
        let Some(combination) = self.combinations.get_mut(&combo_id) else {
            return Err(DomainError::NotFound);
        };
        combination.set_price(price);
        Ok(())
    }

    /// Remove a combination, returning its image paths for deletion.
    pub fn remove_combination(&mut self, combo_id: CombinationId) -> DomainResult<Vec<String>> {
        let Some(combination) = self.combinations.shift_remove(&combo_id) else {
            return Err(DomainError::NotFound);
        };
        Ok(combination.images().to_vec())
    }

    // ------------------------------------------------------------------
    // Product-level toggles and edits
    // ------------------------------------------------------------------

    /// Flip `has_variants`. Only legal while the product carries no variant
    /// data at all; the gateway additionally requires that no stock entries
    /// exist for the product.
    pub fn toggle_has_variants(&mut self) -> DomainResult<bool> {
        if !self.variants.is_empty() || !self.combinations.is_empty() {
            return Err(DomainError::conflict(
                "variants or combinations still exist for this product",
            ));
        }
        self.has_variants = !self.has_variants;
        Ok(self.has_variants)
    }

    /// Flip `is_active`. Going on sale with variant support requires at least
    /// one axis and one combination; taking a product off sale always works.
    pub fn toggle_active(&mut self) -> DomainResult<bool> {
        let next = !self.is_active;
        if next
            && self.has_variants
            && (self.variants.is_empty() || self.combinations.is_empty())
        {
            return Err(DomainError::conflict(
                "a variant product needs at least one variant and one combination before going on sale",
            ));
        }
        self.is_active = next;
        Ok(self.is_active)
    }

    /// Apply a full edit. Returns the product-level image paths that were
    /// detached so the caller can delete the files.
    ///
    /// Flipping `has_variants` either way is refused while variant data
    /// exists. Flipping it off requires a positive price and at least one
    /// image (kept or newly uploaded). Flipping it on purges product-level
    /// images: combinations carry their own from then on.
    pub fn apply_edit(
        &mut self,
        edit: ProductEdit,
        new_images: Vec<String>,
    ) -> DomainResult<Vec<String>> {
        let name = edit.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }

        let prev = self.has_variants;
        let next = edit.has_variants;
        if next != prev && (!self.variants.is_empty() || !self.combinations.is_empty()) {
            return Err(DomainError::conflict(
                "cannot change variant support while variants or combinations exist",
            ));
        }
        if prev && !next {
            if edit.price.unwrap_or(0) == 0 {
                return Err(DomainError::validation(
                    "a sale price is required when variant support is turned off",
                ));
            }
            if new_images.is_empty() && self.images.is_empty() {
                return Err(DomainError::validation(
                    "at least one product image is required when variant support is turned off",
                ));
            }
        }

        let mut detached = Vec::new();
        if next {
            detached = std::mem::take(&mut self.images);
        } else if !new_images.is_empty() {
            detached = std::mem::take(&mut self.images);
            self.images = new_images;
        }

        self.name = name.to_string();
        self.price = if next { 0 } else { edit.price.unwrap_or(0) };
        self.category_id = edit.category_id;
        self.brand_id = edit.brand_id;
        self.product_info = edit.product_info;
        self.usage = edit.usage;
        self.has_variants = next;
        Ok(detached)
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
