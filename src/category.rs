//! Category records and the default seed.
//!
//! Tasks refer to categories by name only; nothing here touches tasks.

use serde::{Deserialize, Deserializer, Serialize};

/// Colours offered when creating a category.
pub const PALETTE: [&str; 8] = [
    "#1976d2", "#2e7d32", "#d32f2f", "#ed6c02", "#9c27b0", "#0288d1", "#7b1fa2", "#c2185b",
];

/// A named, coloured grouping label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
}

impl CategoryDraft {
    /// A draft using the first palette colour.
    pub fn new(name: impl Into<String>) -> Self {
        CategoryDraft {
            name: name.into(),
            color: PALETTE[0].to_string(),
            icon: None,
        }
    }

    pub fn into_category(self, id: u64) -> Category {
        Category {
            id,
            name: self.name,
            color: self.color,
            icon: self.icon,
        }
    }
}

/// Partial update for a category. `id` is never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` clears the icon.
    #[serde(deserialize_with = "patch_icon")]
    pub icon: Option<Option<String>>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        *self == CategoryPatch::default()
    }

    pub fn apply_to(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
    }
}

/// The five categories used when nothing has been stored yet.
pub fn default_categories() -> Vec<Category> {
    [
        (1, "Work", "#1976d2"),
        (2, "Personal", "#2e7d32"),
        (3, "Shopping", "#d32f2f"),
        (4, "Health", "#ed6c02"),
        (5, "Other", "#9c27b0"),
    ]
    .into_iter()
    .map(|(id, name, color)| Category {
        id,
        name: name.to_string(),
        color: color.to_string(),
        icon: None,
    })
    .collect()
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn patch_icon<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}
