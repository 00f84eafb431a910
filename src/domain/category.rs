use serde::{Deserialize, Serialize};

use super::TransactionType;

/// Glyph shown for categories the catalog doesn't know.
pub const DEFAULT_GLYPH: &str = "💸";

/// How a category is drawn. Decided once when the catalog is built,
/// never re-inferred from the string at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CategoryIcon {
    /// Path to an image asset, e.g. `/images/icons/tomato.png`.
    ImagePath(String),
    /// A single emoji or text glyph.
    Glyph(String),
}

impl CategoryIcon {
    /// Classify a raw icon value: anything rooted at `/` is an asset path.
    pub fn resolve(raw: &str) -> Self {
        if raw.starts_with('/') {
            CategoryIcon::ImagePath(raw.to_string())
        } else {
            CategoryIcon::Glyph(raw.to_string())
        }
    }

    /// Text fallback suitable for a terminal.
    pub fn glyph(&self) -> &str {
        match self {
            CategoryIcon::Glyph(glyph) => glyph,
            CategoryIcon::ImagePath(_) => DEFAULT_GLYPH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub kind: TransactionType,
    pub icon: CategoryIcon,
}

/// The built-in category list offered when entering a transaction.
/// Stored transactions may use names outside it; nothing here rejects them.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

const BUILTIN: &[(&str, TransactionType, &str)] = &[
    ("Dining", TransactionType::Expense, "/images/icons/tomato.png"),
    ("Transport", TransactionType::Expense, "/images/icons/carrot.png"),
    ("Shopping", TransactionType::Expense, "/images/icons/shredded-radish.png"),
    ("Entertainment", TransactionType::Expense, "/images/icons/radish-cubes.png"),
    ("Medical", TransactionType::Expense, "/images/icons/radish-slices.png"),
    ("Education", TransactionType::Expense, "/images/icons/scallion.png"),
    ("Salary", TransactionType::Income, "/images/icons/egg.png"),
    ("Bonus", TransactionType::Income, "🎁"),
    ("Investment", TransactionType::Income, "📈"),
    ("Other income", TransactionType::Income, "💸"),
];

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::from_specs(BUILTIN.iter().copied())
    }
}

impl CategoryCatalog {
    /// Build a catalog from `(name, type, icon)` triples, resolving icons up front.
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = (&'a str, TransactionType, &'a str)>) -> Self {
        let categories = specs
            .into_iter()
            .map(|(name, kind, icon)| Category {
                name: name.to_string(),
                kind,
                icon: CategoryIcon::resolve(icon),
            })
            .collect();
        Self { categories }
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn of_type(&self, kind: TransactionType) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.kind == kind)
    }

    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Icon for a category name, falling back to the default glyph.
    pub fn icon_for(&self, name: &str) -> CategoryIcon {
        self.find(name)
            .map(|c| c.icon.clone())
            .unwrap_or_else(|| CategoryIcon::Glyph(DEFAULT_GLYPH.to_string()))
    }
}
