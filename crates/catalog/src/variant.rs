use serde::{Deserialize, Serialize};

use brickstore_core::{Entity, VariantId};

/// Case-insensitive comparison on trimmed values, matching how the admin UI
/// treats names, option values and combination keys.
pub(crate) fn ci_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// A variant axis embedded in a product: a display name plus the ordered list
/// of selectable option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    id: VariantId,
    name: String,
    options: Vec<String>,
}

impl Variant {
    pub(crate) fn new(name: String, options: Vec<String>) -> Self {
        Self {
            id: VariantId::new(),
            name,
            options,
        }
    }

    pub fn id_typed(&self) -> VariantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of `value` among this axis' options (trimmed, case-insensitive).
    pub fn option_index(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| ci_eq(o, value))
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.option_index(value).is_some()
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn push_option(&mut self, value: String) {
        self.options.push(value);
    }

    pub(crate) fn remove_option_at(&mut self, index: usize) {
        self.options.remove(index);
    }

    pub(crate) fn set_option_at(&mut self, index: usize, value: String) {
        self.options[index] = value;
    }
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_lookup_ignores_case_and_whitespace() {
        let variant = Variant::new("Color".to_string(), vec!["Red".into(), "Blue".into()]);
        assert_eq!(variant.option_index("  red "), Some(0));
        assert!(variant.has_option("BLUE"));
        assert!(!variant.has_option("Green"));
    }
}
