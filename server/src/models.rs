use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::collections::BTreeMap;

use barcart_core::{CocktailRecipe, IngredientSlot};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::cocktail_recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct StoredRecipe {
    pub id: String,
    pub name: String,
    pub category: String,
    pub alcoholic: String,
    pub glass: String,
    pub instructions: String,
    pub localized_instructions: serde_json::Value,
    pub thumbnail: String,
    pub tags: Option<String>,
    pub image_source: Option<String>,
    pub date_modified: Option<String>,
    pub ingredients: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl StoredRecipe {
    pub fn into_recipe(self) -> CocktailRecipe {
        let localized: BTreeMap<String, String> =
            serde_json::from_value(self.localized_instructions).unwrap_or_default();
        let ingredients: Vec<IngredientSlot> =
            serde_json::from_value(self.ingredients).unwrap_or_default();

        let mut recipe = CocktailRecipe::new(self.id, self.name);
        recipe.category = self.category;
        recipe.alcoholic = self.alcoholic;
        recipe.glass = self.glass;
        recipe.instructions = self.instructions;
        recipe.localized_instructions = localized;
        recipe.thumbnail = self.thumbnail;
        recipe.tags = self.tags;
        recipe.image_source = self.image_source;
        recipe.date_modified = self.date_modified;
        recipe.ingredients = ingredients;
        recipe
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cocktail_recipes)]
pub struct NewStoredRecipe<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub alcoholic: &'a str,
    pub glass: &'a str,
    pub instructions: &'a str,
    pub localized_instructions: serde_json::Value,
    pub thumbnail: &'a str,
    pub tags: Option<&'a str>,
    pub image_source: Option<&'a str>,
    pub date_modified: Option<&'a str>,
    pub ingredients: serde_json::Value,
}

impl<'a> NewStoredRecipe<'a> {
    pub fn from_recipe(recipe: &'a CocktailRecipe) -> serde_json::Result<Self> {
        Ok(Self {
            id: &recipe.id,
            name: &recipe.name,
            category: &recipe.category,
            alcoholic: &recipe.alcoholic,
            glass: &recipe.glass,
            instructions: &recipe.instructions,
            localized_instructions: serde_json::to_value(&recipe.localized_instructions)?,
            thumbnail: &recipe.thumbnail,
            tags: recipe.tags.as_deref(),
            image_source: recipe.image_source.as_deref(),
            date_modified: recipe.date_modified.as_deref(),
            ingredients: serde_json::to_value(&recipe.ingredients)?,
        })
    }
}
