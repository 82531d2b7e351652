use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
}

impl Category {
    pub fn new(key: String, label: String) -> Self {
        Self { key, label }
    }

    /// Derive a storage key from a display label: trimmed, lowercased,
    /// internal whitespace runs collapsed to single underscores.
    /// Returns an empty string for blank labels.
    pub fn derive_key(label: &str) -> String {
        let lower = label.trim().to_lowercase();
        lower.split_whitespace().collect::<Vec<_>>().join("_")
    }

    /// Find a category by key in a slice.
    pub fn find_by_key<'a>(categories: &'a [Category], key: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.key == key)
    }

    /// Display label for a key, falling back to the raw key when unknown.
    pub fn label_for<'a>(categories: &'a [Category], key: &'a str) -> &'a str {
        Self::find_by_key(categories, key)
            .map(|c| c.label.as_str())
            .unwrap_or(key)
    }

    /// The seed set every fresh install starts with. Users may append but
    /// never rename or delete these keys.
    pub fn defaults() -> Vec<Category> {
        [
            ("home", "Housing"),
            ("food", "Food"),
            ("transport", "Transport"),
            ("health", "Health"),
            ("utilities", "Utilities"),
            ("fun", "Leisure"),
            ("shopping", "Shopping"),
            ("other", "Other"),
        ]
        .iter()
        .map(|(k, l)| Category::new((*k).into(), (*l).into()))
        .collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}
