//! The user's ingredient inventory.
//!
//! The inventory itself is persisted by callers (a JSON array in a durable
//! key-value slot); this module owns the in-memory shape, the dedup rules,
//! and the lenient migration of legacy persisted entries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Advisory grouping for inventory display. Never consulted by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Base,
    Liqueur,
    Mixer,
    Other,
}

impl Category {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "base" => Some(Category::Base),
            "liqueur" => Some(Category::Liqueur),
            "mixer" => Some(Category::Mixer),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::Liqueur => "liqueur",
            Category::Mixer => "mixer",
            Category::Other => "other",
        }
    }
}

/// One owned ingredient. `name` is the display name in the user's language,
/// `name_en` the canonical English name handed to the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub name_en: String,
    #[serde(default)]
    pub category: Category,
}

impl InventoryItem {
    /// A new item with a generated id.
    pub fn new(name: impl Into<String>, name_en: impl Into<String>, category: Category) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            name_en: name_en.into(),
            category,
        }
    }
}

/// The full inventory, deduplicated by case-insensitive `name_en`.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, keeping the first occurrence of each `name_en`.
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        let mut inventory = Self::new();
        for item in items {
            inventory.add(item);
        }
        inventory
    }

    /// Parse a persisted JSON array, recovering what can be recovered:
    /// non-objects are dropped, missing ids get a generated `legacy-` id,
    /// a blank `nameEn` falls back to `name`, unknown categories become
    /// `base`, and entries without a usable name are dropped. Never fails.
    pub fn parse_lenient(raw: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unparseable inventory");
                return Self::new();
            }
        };
        let Some(entries) = value.as_array() else {
            tracing::warn!("persisted inventory is not an array, discarding");
            return Self::new();
        };

        let mut items = Vec::new();
        for entry in entries {
            let Some(object) = entry.as_object() else {
                continue;
            };
            let field = |key: &str| {
                object
                    .get(key)
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            };

            let name = field("name").unwrap_or_default();
            let name_en = field("nameEn").unwrap_or_else(|| name.clone());
            if name.is_empty() || name_en.is_empty() {
                continue;
            }

            let id = field("id").unwrap_or_else(|| format!("legacy-{}", Uuid::new_v4()));
            let category = field("category")
                .as_deref()
                .and_then(Category::parse)
                .unwrap_or_default();

            items.push(InventoryItem {
                id,
                name,
                name_en,
                category,
            });
        }
        Self::from_items(items)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item. Adding an already-owned ingredient name is a no-op;
    /// returns whether the item was actually added.
    pub fn add(&mut self, item: InventoryItem) -> bool {
        let duplicate = self
            .items
            .iter()
            .any(|existing| existing.name_en.eq_ignore_ascii_case(&item.name_en));
        if duplicate {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove by id; returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The `name_en` list handed to the matcher and the aggregator.
    pub fn owned_names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name_en.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_dedups_by_name_en_case_insensitively() {
        let mut inventory = Inventory::new();
        assert!(inventory.add(InventoryItem::new("보드카", "Vodka", Category::Base)));
        assert!(!inventory.add(InventoryItem::new("vodka again", "VODKA", Category::Base)));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut inventory = Inventory::new();
        let item = InventoryItem::new("진", "gin", Category::Base);
        let id = item.id.clone();
        inventory.add(item);
        assert!(inventory.remove(&id));
        assert!(!inventory.remove(&id));

        inventory.add(InventoryItem::new("럼", "rum", Category::Base));
        inventory.clear();
        assert!(inventory.is_empty());
    }

    #[test]
    fn lenient_parse_migrates_legacy_entries() {
        let raw = r#"[
            {"id": "a1", "name": "보드카", "nameEn": "vodka", "category": "base"},
            {"name": "진", "nameEn": "gin", "category": "nonsense"},
            {"name": "럼"},
            {"name": "", "nameEn": "ghost"},
            "not an object",
            {"id": "a2", "nameEn": "no display name"}
        ]"#;
        let inventory = Inventory::parse_lenient(raw);
        assert_eq!(inventory.len(), 3);

        let items = inventory.items();
        assert_eq!(items[0].id, "a1");

        // Migrated entry gets a generated legacy id and a defaulted category.
        assert!(items[1].id.starts_with("legacy-"));
        assert_eq!(items[1].category, Category::Base);

        // nameEn falls back to name.
        assert_eq!(items[2].name_en, "럼");
    }

    #[test]
    fn lenient_parse_survives_garbage() {
        assert!(Inventory::parse_lenient("not json at all").is_empty());
        assert!(Inventory::parse_lenient("{\"items\": 3}").is_empty());
        assert!(Inventory::parse_lenient("[]").is_empty());
    }

    #[test]
    fn owned_names_round_trip() {
        let mut inventory = Inventory::new();
        inventory.add(InventoryItem::new("보드카", "vodka", Category::Base));
        inventory.add(InventoryItem::new("라임", "lime", Category::Mixer));
        assert_eq!(inventory.owned_names(), vec!["vodka", "lime"]);
    }
}
