use std::collections::HashMap;

use crate::cratemaker::cutsheet::model::Category;

/// Number of leading part-number characters used as the classification key.
pub const PREFIX_LEN: usize = 3;

/// Default prefix assignments of the cutsheet template family.
pub const DEFAULT_PREFIXES: [(&str, Category); 3] = [
    ("LUM", Category::Lumber),
    ("PLY", Category::Ply),
    ("FOM", Category::Foam),
];

/// Immutable prefix → category lookup. Unknown prefixes resolve to
/// [`Category::Other`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    entries: HashMap<String, Category>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_entries(
            DEFAULT_PREFIXES
                .iter()
                .map(|(prefix, category)| (prefix.to_string(), *category)),
        )
    }
}

impl CategoryTable {
    /// Builds a table from explicit entries. Keys are truncated to the prefix
    /// length so they match what [`classify`](Self::classify) looks up.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Category)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, category)| (prefix_of(&key).to_string(), category))
            .collect();
        Self { entries }
    }

    /// Returns a copy of the table with `overrides` applied on top.
    pub fn with_overrides(&self, overrides: impl IntoIterator<Item = (String, Category)>) -> Self {
        let mut entries = self.entries.clone();
        for (key, category) in overrides {
            entries.insert(prefix_of(&key).to_string(), category);
        }
        Self { entries }
    }

    /// Classifies a part number by its leading characters.
    pub fn classify(&self, part_number: &str) -> Category {
        self.entries
            .get(prefix_of(part_number))
            .copied()
            .unwrap_or(Category::Other)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First [`PREFIX_LEN`] characters of `value`, or all of it when shorter.
pub fn prefix_of(value: &str) -> &str {
    match value.char_indices().nth(PREFIX_LEN) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}
