//! Client for the primary cocktail API (search by name or first letter,
//! filter by ingredient, lookup by id).
//!
//! The wire format uses numbered `strIngredient1..15` / `strMeasure1..15`
//! fields; they are folded into the common ordered slot list here and never
//! leak past this module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use utoipa::ToSchema;

use crate::error::FetchError;
use crate::types::CocktailRecipe;

pub const COCKTAIL_DB_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A recipe known only by id/name/thumbnail, as returned by the
/// filter-by-ingredient endpoint. Full detail requires a by-id lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeStub {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
}

/// The primary external recipe API.
#[async_trait]
pub trait CocktailApi: Send + Sync {
    async fn search_by_name(&self, name: &str) -> Result<Vec<CocktailRecipe>, FetchError>;

    /// Paginated harvest endpoint: all drinks whose name starts with `letter`.
    async fn search_by_first_letter(&self, letter: char)
        -> Result<Vec<CocktailRecipe>, FetchError>;

    async fn filter_by_ingredient(&self, ingredient: &str)
        -> Result<Vec<RecipeStub>, FetchError>;

    async fn lookup_by_id(&self, id: &str) -> Result<Option<CocktailRecipe>, FetchError>;
}

/// Production client over reqwest.
pub struct CocktailDbClient {
    base_url: String,
    client: reqwest::Client,
}

impl CocktailDbClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base_url(COCKTAIL_DB_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("barcart/0.1")
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_envelope<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, "cocktaildb request");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CocktailApi for CocktailDbClient {
    async fn search_by_name(&self, name: &str) -> Result<Vec<CocktailRecipe>, FetchError> {
        let envelope: DrinkEnvelope = self.get_envelope("search.php", &[("s", name)]).await?;
        Ok(envelope.into_recipes())
    }

    async fn search_by_first_letter(
        &self,
        letter: char,
    ) -> Result<Vec<CocktailRecipe>, FetchError> {
        let letter = letter.to_string();
        let envelope: DrinkEnvelope = self
            .get_envelope("search.php", &[("f", letter.as_str())])
            .await?;
        Ok(envelope.into_recipes())
    }

    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<RecipeStub>, FetchError> {
        let envelope: StubEnvelope = self
            .get_envelope("filter.php", &[("i", ingredient)])
            .await?;
        Ok(envelope
            .drinks
            .unwrap_or_default()
            .into_iter()
            .filter_map(StubRow::into_stub)
            .collect())
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<CocktailRecipe>, FetchError> {
        let envelope: DrinkEnvelope = self.get_envelope("lookup.php", &[("i", id)]).await?;
        Ok(envelope.into_recipes().into_iter().next())
    }
}

/// `{ drinks: [...] | null }` response envelope. A null `drinks` means an
/// empty result, not an error.
#[derive(Deserialize)]
struct DrinkEnvelope {
    drinks: Option<Vec<DrinkRow>>,
}

impl DrinkEnvelope {
    fn into_recipes(self) -> Vec<CocktailRecipe> {
        self.drinks
            .unwrap_or_default()
            .into_iter()
            .filter_map(DrinkRow::into_recipe)
            .collect()
    }
}

#[derive(Deserialize)]
struct StubEnvelope {
    drinks: Option<Vec<StubRow>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StubRow {
    #[serde(rename = "idDrink")]
    id: Option<String>,
    #[serde(rename = "strDrink")]
    name: Option<String>,
    #[serde(rename = "strDrinkThumb")]
    thumbnail: Option<String>,
}

impl StubRow {
    fn into_stub(self) -> Option<RecipeStub> {
        let id = non_blank(self.id)?;
        Some(RecipeStub {
            id,
            name: non_blank(self.name).unwrap_or_default(),
            thumbnail: non_blank(self.thumbnail).unwrap_or_default(),
        })
    }
}

/// Full recipe row as the API serves it.
#[derive(Deserialize, Default)]
#[serde(default)]
struct DrinkRow {
    #[serde(rename = "idDrink")]
    id: Option<String>,
    #[serde(rename = "strDrink")]
    name: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strAlcoholic")]
    alcoholic: Option<String>,
    #[serde(rename = "strGlass")]
    glass: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strInstructionsKR")]
    instructions_kr: Option<String>,
    #[serde(rename = "strInstructionsES")]
    instructions_es: Option<String>,
    #[serde(rename = "strInstructionsDE")]
    instructions_de: Option<String>,
    #[serde(rename = "strInstructionsFR")]
    instructions_fr: Option<String>,
    #[serde(rename = "strInstructionsIT")]
    instructions_it: Option<String>,
    #[serde(rename = "strInstructionsZH-HANS")]
    instructions_zh_hans: Option<String>,
    #[serde(rename = "strInstructionsZH-HANT")]
    instructions_zh_hant: Option<String>,
    #[serde(rename = "strDrinkThumb")]
    thumbnail: Option<String>,
    #[serde(rename = "strTags")]
    tags: Option<String>,
    #[serde(rename = "strImageSource")]
    image_source: Option<String>,
    #[serde(rename = "dateModified")]
    date_modified: Option<String>,
    #[serde(rename = "strIngredient1")]
    ingredient1: Option<String>,
    #[serde(rename = "strIngredient2")]
    ingredient2: Option<String>,
    #[serde(rename = "strIngredient3")]
    ingredient3: Option<String>,
    #[serde(rename = "strIngredient4")]
    ingredient4: Option<String>,
    #[serde(rename = "strIngredient5")]
    ingredient5: Option<String>,
    #[serde(rename = "strIngredient6")]
    ingredient6: Option<String>,
    #[serde(rename = "strIngredient7")]
    ingredient7: Option<String>,
    #[serde(rename = "strIngredient8")]
    ingredient8: Option<String>,
    #[serde(rename = "strIngredient9")]
    ingredient9: Option<String>,
    #[serde(rename = "strIngredient10")]
    ingredient10: Option<String>,
    #[serde(rename = "strIngredient11")]
    ingredient11: Option<String>,
    #[serde(rename = "strIngredient12")]
    ingredient12: Option<String>,
    #[serde(rename = "strIngredient13")]
    ingredient13: Option<String>,
    #[serde(rename = "strIngredient14")]
    ingredient14: Option<String>,
    #[serde(rename = "strIngredient15")]
    ingredient15: Option<String>,
    #[serde(rename = "strMeasure1")]
    measure1: Option<String>,
    #[serde(rename = "strMeasure2")]
    measure2: Option<String>,
    #[serde(rename = "strMeasure3")]
    measure3: Option<String>,
    #[serde(rename = "strMeasure4")]
    measure4: Option<String>,
    #[serde(rename = "strMeasure5")]
    measure5: Option<String>,
    #[serde(rename = "strMeasure6")]
    measure6: Option<String>,
    #[serde(rename = "strMeasure7")]
    measure7: Option<String>,
    #[serde(rename = "strMeasure8")]
    measure8: Option<String>,
    #[serde(rename = "strMeasure9")]
    measure9: Option<String>,
    #[serde(rename = "strMeasure10")]
    measure10: Option<String>,
    #[serde(rename = "strMeasure11")]
    measure11: Option<String>,
    #[serde(rename = "strMeasure12")]
    measure12: Option<String>,
    #[serde(rename = "strMeasure13")]
    measure13: Option<String>,
    #[serde(rename = "strMeasure14")]
    measure14: Option<String>,
    #[serde(rename = "strMeasure15")]
    measure15: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl DrinkRow {
    fn into_recipe(self) -> Option<CocktailRecipe> {
        let id = non_blank(self.id)?;
        let name = non_blank(self.name).unwrap_or_default();
        let mut recipe = CocktailRecipe::new(id, name);
        recipe.category = non_blank(self.category).unwrap_or_default();
        recipe.alcoholic = non_blank(self.alcoholic).unwrap_or_default();
        recipe.glass = non_blank(self.glass).unwrap_or_default();
        recipe.instructions = non_blank(self.instructions).unwrap_or_default();
        recipe.thumbnail = non_blank(self.thumbnail).unwrap_or_default();
        recipe.tags = non_blank(self.tags);
        recipe.image_source = non_blank(self.image_source);
        recipe.date_modified = non_blank(self.date_modified);

        let localized = [
            ("kr", self.instructions_kr),
            ("es", self.instructions_es),
            ("de", self.instructions_de),
            ("fr", self.instructions_fr),
            ("it", self.instructions_it),
            ("zh-hans", self.instructions_zh_hans),
            ("zh-hant", self.instructions_zh_hant),
        ];
        for (lang, text) in localized {
            if let Some(text) = non_blank(text) {
                recipe.localized_instructions.insert(lang.to_string(), text);
            }
        }

        let slots = [
            (self.ingredient1, self.measure1),
            (self.ingredient2, self.measure2),
            (self.ingredient3, self.measure3),
            (self.ingredient4, self.measure4),
            (self.ingredient5, self.measure5),
            (self.ingredient6, self.measure6),
            (self.ingredient7, self.measure7),
            (self.ingredient8, self.measure8),
            (self.ingredient9, self.measure9),
            (self.ingredient10, self.measure10),
            (self.ingredient11, self.measure11),
            (self.ingredient12, self.measure12),
            (self.ingredient13, self.measure13),
            (self.ingredient14, self.measure14),
            (self.ingredient15, self.measure15),
        ];
        for (ingredient, measure) in slots {
            if let Some(ingredient) = non_blank(ingredient) {
                recipe.push_ingredient(&ingredient, measure);
            }
        }

        Some(recipe)
    }
}

/// Mock for tests: canned responses per name/ingredient/id, or a client that
/// fails every call to exercise source degradation.
#[derive(Default)]
pub struct MockCocktailApi {
    by_name: HashMap<String, Vec<CocktailRecipe>>,
    by_ingredient: HashMap<String, Vec<RecipeStub>>,
    by_id: HashMap<String, CocktailRecipe>,
    failing: bool,
}

impl MockCocktailApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every call returns an error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, name: &str, recipes: Vec<CocktailRecipe>) -> Self {
        self.by_name.insert(name.to_string(), recipes);
        self
    }

    pub fn with_ingredient(mut self, ingredient: &str, stubs: Vec<RecipeStub>) -> Self {
        self.by_ingredient.insert(ingredient.to_string(), stubs);
        self
    }

    /// Register a recipe for by-id lookup, and derive a filter stub for each
    /// of its ingredient names.
    pub fn with_recipe(mut self, recipe: CocktailRecipe) -> Self {
        for name in recipe.ingredient_names() {
            self.by_ingredient
                .entry(name)
                .or_default()
                .push(RecipeStub {
                    id: recipe.id.clone(),
                    name: recipe.name.clone(),
                    thumbnail: recipe.thumbnail.clone(),
                });
        }
        self.by_id.insert(recipe.id.clone(), recipe);
        self
    }

    fn check(&self) -> Result<(), FetchError> {
        if self.failing {
            Err(FetchError::InvalidRequest("mock failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CocktailApi for MockCocktailApi {
    async fn search_by_name(&self, name: &str) -> Result<Vec<CocktailRecipe>, FetchError> {
        self.check()?;
        Ok(self.by_name.get(name).cloned().unwrap_or_default())
    }

    async fn search_by_first_letter(
        &self,
        letter: char,
    ) -> Result<Vec<CocktailRecipe>, FetchError> {
        self.check()?;
        Ok(self
            .by_id
            .values()
            .filter(|recipe| {
                recipe
                    .name
                    .to_lowercase()
                    .starts_with(letter.to_ascii_lowercase())
            })
            .cloned()
            .collect())
    }

    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<RecipeStub>, FetchError> {
        self.check()?;
        Ok(self.by_ingredient.get(ingredient).cloned().unwrap_or_default())
    }

    async fn lookup_by_id(&self, id: &str) -> Result<Option<CocktailRecipe>, FetchError> {
        self.check()?;
        Ok(self.by_id.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drink_row_folds_numbered_slots() {
        let row: DrinkRow = serde_json::from_value(serde_json::json!({
            "idDrink": "11007",
            "strDrink": "Margarita",
            "strCategory": "Ordinary Drink",
            "strAlcoholic": "Alcoholic",
            "strGlass": "Cocktail glass",
            "strInstructions": "Shake with ice.",
            "strInstructionsDE": "Mit Eis schütteln.",
            "strDrinkThumb": "https://example.test/margarita.jpg",
            "strIngredient1": "Tequila",
            "strMeasure1": "1 1/2 oz ",
            "strIngredient2": "Triple sec",
            "strMeasure2": "1/2 oz",
            "strIngredient3": "Lime juice",
            "strMeasure3": null,
            "strIngredient4": null,
            "strMeasure4": "orphan measure"
        }))
        .unwrap();

        let recipe = row.into_recipe().unwrap();
        assert_eq!(recipe.id, "11007");
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].ingredient, "Tequila");
        assert_eq!(recipe.ingredients[0].measure.as_deref(), Some("1 1/2 oz"));
        assert!(recipe.ingredients[2].measure.is_none());
        assert_eq!(
            recipe.localized_instructions.get("de").map(String::as_str),
            Some("Mit Eis schütteln.")
        );
    }

    #[test]
    fn rows_without_id_are_dropped() {
        let row = DrinkRow {
            name: Some("Nameless".to_string()),
            ..DrinkRow::default()
        };
        assert!(row.into_recipe().is_none());
    }

    #[test]
    fn null_drinks_envelope_is_empty() {
        let envelope: DrinkEnvelope = serde_json::from_str(r#"{"drinks": null}"#).unwrap();
        assert!(envelope.into_recipes().is_empty());
    }

    #[tokio::test]
    async fn mock_round_trip() {
        let mut recipe = CocktailRecipe::new("42", "Test Drink");
        recipe.push_ingredient("gin", None);
        let mock = MockCocktailApi::new().with_recipe(recipe);

        let stubs = mock.filter_by_ingredient("gin").await.unwrap();
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].id, "42");
        assert!(mock.lookup_by_id("42").await.unwrap().is_some());
        assert!(mock.lookup_by_id("43").await.unwrap().is_none());

        assert!(MockCocktailApi::failing()
            .filter_by_ingredient("gin")
            .await
            .is_err());
    }
}
