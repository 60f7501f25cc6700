use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::matcher::normalize;

/// Maximum number of ingredient slots a recipe can carry.
pub const MAX_INGREDIENT_SLOTS: usize = 15;

/// Identity prefix for recipes bundled with the static dataset.
pub const LOCAL_ID_PREFIX: &str = "local-";
/// Identity prefix for recipes synthesized from the Ninja API.
pub const NINJA_ID_PREFIX: &str = "ninja-";
/// Identity prefix for user-authored recipes.
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// One (ingredient, measure) pair of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientSlot {
    pub ingredient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Option<String>,
}

impl IngredientSlot {
    pub fn new(ingredient: impl Into<String>, measure: Option<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            measure,
        }
    }
}

/// A cocktail recipe in the common shape shared by every source.
///
/// The ingredient list is an explicit ordered slot list, capped at
/// [`MAX_INGREDIENT_SLOTS`]; wire formats with numbered fields are translated
/// at the source boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CocktailRecipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub alcoholic: String,
    #[serde(default)]
    pub glass: String,
    #[serde(default)]
    pub instructions: String,
    /// Localized instruction variants keyed by language tag ("kr", "es", ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub localized_instructions: BTreeMap<String, String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientSlot>,
}

impl CocktailRecipe {
    /// A recipe with identity and name set and everything else empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            alcoholic: String::new(),
            glass: String::new(),
            instructions: String::new(),
            localized_instructions: BTreeMap::new(),
            thumbnail: String::new(),
            tags: None,
            image_source: None,
            date_modified: None,
            ingredients: Vec::new(),
        }
    }

    /// Append an ingredient slot, skipping blank names and respecting the
    /// slot cap. Returns whether the slot was added.
    pub fn push_ingredient(&mut self, ingredient: &str, measure: Option<String>) -> bool {
        let ingredient = ingredient.trim();
        if ingredient.is_empty() || self.ingredients.len() >= MAX_INGREDIENT_SLOTS {
            return false;
        }
        let measure = measure
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from);
        self.ingredients.push(IngredientSlot::new(ingredient, measure));
        true
    }

    /// Normalized, non-empty ingredient names in slot order.
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|slot| normalize(&slot.ingredient))
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn id_kind(&self) -> RecipeIdKind {
        classify_recipe_id(&self.id)
    }
}

/// Where a recipe id points: which source can resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeIdKind {
    /// Numeric id from the primary external API.
    CocktailDb,
    /// `local-` prefixed id from the bundled dataset.
    Local,
    /// `ninja-` prefixed synthetic id.
    Ninja,
    /// `custom-` prefixed user recipe.
    Custom,
    /// Anything else; treated as a search term by the API surface.
    Unknown,
}

pub fn classify_recipe_id(id: &str) -> RecipeIdKind {
    if id.starts_with(LOCAL_ID_PREFIX) {
        RecipeIdKind::Local
    } else if id.starts_with(NINJA_ID_PREFIX) {
        RecipeIdKind::Ninja
    } else if id.starts_with(CUSTOM_ID_PREFIX) {
        RecipeIdKind::Custom
    } else if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        RecipeIdKind::CocktailDb
    } else {
        RecipeIdKind::Unknown
    }
}

/// A user-authored recipe as submitted: a simple name/measure list instead of
/// the fixed slot layout.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CustomRecipeInput {
    pub name: String,
    pub ingredients: Vec<IngredientSlot>,
    pub instructions: String,
}

impl CustomRecipeInput {
    /// Convert into the common recipe shape with a `custom-<millis>` id.
    pub fn into_recipe(self, created_at: DateTime<Utc>) -> CocktailRecipe {
        let mut recipe = CocktailRecipe::new(
            format!("{CUSTOM_ID_PREFIX}{}", created_at.timestamp_millis()),
            self.name.trim(),
        );
        recipe.category = "Custom".to_string();
        recipe.alcoholic = "Alcoholic".to_string();
        recipe.glass = "Cocktail glass".to_string();
        recipe.instructions = self.instructions.trim().to_string();
        for slot in self.ingredients {
            recipe.push_ingredient(&slot.ingredient, slot.measure);
        }
        recipe
    }
}

/// The `{ drinks: [...] }` envelope used by the service surface.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub drinks: Vec<CocktailRecipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_classification() {
        assert_eq!(classify_recipe_id("11007"), RecipeIdKind::CocktailDb);
        assert_eq!(classify_recipe_id("local-hf-12"), RecipeIdKind::Local);
        assert_eq!(classify_recipe_id("ninja-mojito-1a2b"), RecipeIdKind::Ninja);
        assert_eq!(classify_recipe_id("custom-1700000000000"), RecipeIdKind::Custom);
        assert_eq!(classify_recipe_id("margarita"), RecipeIdKind::Unknown);
        assert_eq!(classify_recipe_id(""), RecipeIdKind::Unknown);
    }

    #[test]
    fn push_ingredient_skips_blanks_and_caps_slots() {
        let mut recipe = CocktailRecipe::new("1", "Test");
        assert!(!recipe.push_ingredient("   ", None));
        for i in 0..MAX_INGREDIENT_SLOTS {
            assert!(recipe.push_ingredient(&format!("ingredient {i}"), None));
        }
        assert!(!recipe.push_ingredient("one too many", None));
        assert_eq!(recipe.ingredients.len(), MAX_INGREDIENT_SLOTS);
    }

    #[test]
    fn ingredient_names_are_normalized() {
        let mut recipe = CocktailRecipe::new("1", "Test");
        recipe.push_ingredient("  White Rum ", Some("2 oz".to_string()));
        recipe.push_ingredient("Lime.", None);
        assert_eq!(recipe.ingredient_names(), vec!["white rum", "lime"]);
    }

    #[test]
    fn custom_recipe_gets_timestamped_id() {
        let input = CustomRecipeInput {
            name: " Home Special ".to_string(),
            ingredients: vec![IngredientSlot::new("vodka", Some("4 cl".to_string()))],
            instructions: "Stir.".to_string(),
        };
        let created_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let recipe = input.into_recipe(created_at);
        assert_eq!(recipe.id, "custom-1700000000000");
        assert_eq!(recipe.name, "Home Special");
        assert_eq!(recipe.id_kind(), RecipeIdKind::Custom);
        assert_eq!(recipe.ingredients.len(), 1);
    }
}
