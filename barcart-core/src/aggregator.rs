//! Multi-source recipe aggregation.
//!
//! One shared aggregator fans out to the recipe store, the static dataset,
//! and the external APIs, merges and dedups what comes back, and filters the
//! result through the availability matcher. Every source is independently
//! failable: a timeout, network error, or missing configuration degrades that
//! source to an empty contribution and the aggregate request still succeeds.

use futures_util::stream::{self, StreamExt};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::dataset::StaticDataset;
use crate::matcher::{
    is_alcoholic, is_ingredient_available, normalize, normalize_display_name,
    required_owned_ingredients,
};
use crate::sources::{lookup_by_ninja_id, CocktailApi, NinjaApi, RecipeStub};
use crate::store::RecipeStore;
use crate::types::{classify_recipe_id, CocktailRecipe, RecipeIdKind};

/// Result and fan-out bounds for the aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Cap on the "available cocktails" result list.
    pub max_available_results: usize,
    /// Cap on the name-search result list.
    pub max_search_results: usize,
    /// Cap on by-id detail lookups after a filter fan-out.
    pub max_detail_lookups: usize,
    /// Cap on concurrent outbound requests to the external API.
    pub max_concurrent_requests: usize,
    /// How many cached recipes to pull from the store per aggregation.
    pub store_scan_limit: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_available_results: 300,
            max_search_results: 30,
            max_detail_lookups: 120,
            max_concurrent_requests: 24,
            store_scan_limit: 3000,
        }
    }
}

/// The shared aggregation entry point. Sources are injected; absent optional
/// sources (no store, no secondary API key) simply contribute nothing.
pub struct Aggregator {
    cocktail_db: Arc<dyn CocktailApi>,
    ninjas: Option<Arc<dyn NinjaApi>>,
    store: Option<Arc<dyn RecipeStore>>,
    dataset: Arc<StaticDataset>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(cocktail_db: Arc<dyn CocktailApi>, dataset: Arc<StaticDataset>) -> Self {
        Self {
            cocktail_db,
            ninjas: None,
            store: None,
            dataset,
            config: AggregatorConfig::default(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn RecipeStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_ninjas(mut self, ninjas: Arc<dyn NinjaApi>) -> Self {
        self.ninjas = Some(ninjas);
        self
    }

    pub fn with_config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// All recipes fully makeable from the given inventory ingredient names.
    ///
    /// Non-alcoholic inventory entries are ignored up front; with no owned
    /// alcohol there is nothing to match and the result is empty without any
    /// source traffic.
    pub async fn available_cocktails(&self, ingredient_names: &[String]) -> Vec<CocktailRecipe> {
        let owned: Vec<String> = ingredient_names
            .iter()
            .map(|name| normalize(name))
            .filter(|name| !name.is_empty() && is_alcoholic(name))
            .collect();
        if owned.is_empty() {
            return Vec::new();
        }

        let (cached, external) = tokio::join!(
            self.list_store(),
            self.fetch_external_by_ingredients(&owned)
        );

        let mut merged = cached;
        merged.extend(self.dataset.drinks().iter().cloned());
        merged.extend(external);

        let deduped = dedupe_by_name(dedupe_by_id(merged));
        let mut available: Vec<CocktailRecipe> = deduped
            .into_iter()
            .filter(|recipe| Self::is_available(recipe, &owned))
            .collect();
        available.truncate(self.config.max_available_results);
        available
    }

    /// Name search across the store, the bundled dataset, and both external
    /// APIs, in that precedence order. External hits not yet cached are
    /// backfilled fire-and-forget.
    pub async fn search(&self, query: &str) -> Vec<CocktailRecipe> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let (cached, primary, secondary) = tokio::join!(
            self.search_store(query),
            self.search_cocktail_db(query),
            self.search_ninjas(query)
        );
        let local: Vec<CocktailRecipe> =
            self.dataset.search_name(query).into_iter().cloned().collect();

        let cached_ids: HashSet<String> = cached.iter().map(|r| r.id.clone()).collect();
        let external: Vec<CocktailRecipe> =
            primary.into_iter().chain(secondary).collect();
        self.backfill_store(
            external
                .iter()
                .filter(|recipe| !cached_ids.contains(&recipe.id))
                .cloned()
                .collect(),
        );

        let mut merged = cached;
        merged.extend(local);
        merged.extend(external);
        let mut results = dedupe_by_id(merged);
        results.truncate(self.config.max_search_results);
        results
    }

    /// Resolve one recipe by id: store, then the bundled dataset, then the
    /// source the id shape points at. A successful non-store resolution is
    /// written back to the store without delaying the response. `None` after
    /// exhausting all sources is terminal; callers surface it as not-found.
    pub async fn recipe_by_id(&self, id: &str) -> Option<CocktailRecipe> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        if let Some(store) = &self.store {
            match store.get(id).await {
                Ok(Some(recipe)) => {
                    tracing::debug!(id, "recipe store hit");
                    return Some(recipe);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(id, error = %e, "recipe store lookup failed, trying other sources");
                }
            }
        }

        if let Some(recipe) = self.dataset.get(id) {
            let recipe = recipe.clone();
            self.backfill_store(vec![recipe.clone()]);
            return Some(recipe);
        }

        let resolved = match classify_recipe_id(id) {
            RecipeIdKind::CocktailDb => match self.cocktail_db.lookup_by_id(id).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(id, error = %e, "cocktaildb lookup failed");
                    None
                }
            },
            RecipeIdKind::Ninja => match &self.ninjas {
                Some(api) => match lookup_by_ninja_id(api.as_ref(), id).await {
                    Ok(found) => found,
                    Err(e) => {
                        tracing::warn!(id, error = %e, "ninja lookup failed");
                        None
                    }
                },
                None => None,
            },
            // Local ids live in the dataset (already checked); custom recipes
            // only ever exist in the store.
            RecipeIdKind::Local | RecipeIdKind::Custom | RecipeIdKind::Unknown => None,
        }?;

        self.backfill_store(vec![resolved.clone()]);
        Some(resolved)
    }

    /// OR-query accumulation across the filter-by-ingredient endpoint: one
    /// request per ingredient, results keyed by recipe id. A recipe matched
    /// by more than one ingredient keeps a single entry with the extra
    /// ingredients appended to its display name.
    pub async fn cocktails_by_ingredients(&self, ingredients: &[String]) -> Vec<RecipeStub> {
        let responses = stream::iter(ingredients.iter().cloned())
            .map(|ingredient| {
                let api = Arc::clone(&self.cocktail_db);
                async move {
                    let result = api.filter_by_ingredient(&ingredient).await;
                    (ingredient, result)
                }
            })
            .buffer_unordered(self.config.max_concurrent_requests.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut by_id: HashMap<String, RecipeStub> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        // Responses arrive in completion order; re-sort by the query list so
        // annotation order stays deterministic.
        let mut responses = responses;
        responses.sort_by_key(|(ingredient, _)| {
            ingredients.iter().position(|i| i == ingredient).unwrap_or(usize::MAX)
        });

        for (ingredient, result) in responses {
            let stubs = match result {
                Ok(stubs) => stubs,
                Err(e) => {
                    tracing::warn!(%ingredient, error = %e, "ingredient filter failed, skipping source");
                    continue;
                }
            };
            for stub in stubs {
                match by_id.entry(stub.id.clone()) {
                    Entry::Occupied(mut occupied) => {
                        let existing = occupied.get_mut();
                        existing.name.push_str(&format!(" ({ingredient})"));
                    }
                    Entry::Vacant(vacant) => {
                        order.push(stub.id.clone());
                        vacant.insert(stub);
                    }
                }
            }
        }

        order
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect()
    }

    fn is_available(recipe: &CocktailRecipe, owned: &[String]) -> bool {
        let required = required_owned_ingredients(&recipe.ingredient_names());
        // A recipe with no defining alcoholic ingredient (ice and soda only)
        // can't be "made" from an inventory; without this guard the all()
        // below would be vacuously true.
        if required.is_empty() {
            return false;
        }
        required
            .iter()
            .all(|ingredient| is_ingredient_available(ingredient, owned))
    }

    async fn fetch_external_by_ingredients(&self, owned: &[String]) -> Vec<CocktailRecipe> {
        let stubs = self.cocktails_by_ingredients(owned).await;
        let ids: Vec<String> = stubs
            .into_iter()
            .map(|stub| stub.id)
            .take(self.config.max_detail_lookups)
            .collect();

        stream::iter(ids)
            .map(|id| {
                let api = Arc::clone(&self.cocktail_db);
                async move {
                    match api.lookup_by_id(&id).await {
                        Ok(found) => found,
                        Err(e) => {
                            tracing::warn!(%id, error = %e, "detail lookup failed, dropping candidate");
                            None
                        }
                    }
                }
            })
            .buffer_unordered(self.config.max_concurrent_requests.max(1))
            .filter_map(|found| async move { found })
            .collect()
            .await
    }

    async fn list_store(&self) -> Vec<CocktailRecipe> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        match store.list(self.config.store_scan_limit).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!(error = %e, "recipe store list failed, continuing without it");
                Vec::new()
            }
        }
    }

    async fn search_store(&self, query: &str) -> Vec<CocktailRecipe> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        match store.search_name(query).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!(query, error = %e, "recipe store search failed, continuing without it");
                Vec::new()
            }
        }
    }

    async fn search_cocktail_db(&self, query: &str) -> Vec<CocktailRecipe> {
        match self.cocktail_db.search_by_name(query).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!(query, error = %e, "cocktaildb search failed, skipping source");
                Vec::new()
            }
        }
    }

    async fn search_ninjas(&self, query: &str) -> Vec<CocktailRecipe> {
        let Some(api) = &self.ninjas else {
            return Vec::new();
        };
        match api.search_by_name(query).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!(query, error = %e, "ninja search failed, skipping source");
                Vec::new()
            }
        }
    }

    /// Write recipes into the store without blocking the response path.
    /// Failures are logged, never retried.
    fn backfill_store(&self, recipes: Vec<CocktailRecipe>) {
        let Some(store) = &self.store else {
            return;
        };
        if recipes.is_empty() {
            return;
        }
        let store = Arc::clone(store);
        tokio::spawn(async move {
            for recipe in recipes {
                if let Err(e) = store.insert_if_absent(&recipe).await {
                    tracing::warn!(id = %recipe.id, error = %e, "recipe backfill failed");
                }
            }
        });
    }
}

/// Deduplicate by recipe identity, first occurrence wins. Merge order is
/// source precedence, so the store's copy beats an external re-fetch.
pub fn dedupe_by_id(recipes: Vec<CocktailRecipe>) -> Vec<CocktailRecipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|recipe| seen.insert(recipe.id.clone()))
        .collect()
}

/// Deduplicate by normalized display name: the same drink can appear under
/// different ids from different sources. Recipes with an empty normalized
/// name are dropped.
pub fn dedupe_by_name(recipes: Vec<CocktailRecipe>) -> Vec<CocktailRecipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|recipe| {
            let key = normalize_display_name(&recipe.name);
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, name: &str, ingredients: &[&str]) -> CocktailRecipe {
        let mut recipe = CocktailRecipe::new(id, name);
        for ingredient in ingredients {
            recipe.push_ingredient(ingredient, None);
        }
        recipe
    }

    #[test]
    fn dedupe_by_id_keeps_first_occurrence() {
        let merged = vec![
            recipe("1", "From Store", &["vodka"]),
            recipe("1", "From Api", &["vodka"]),
            recipe("2", "Other", &["gin"]),
        ];
        let deduped = dedupe_by_id(merged);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].name, "From Store");
    }

    #[test]
    fn dedupe_is_idempotent_over_self_merge() {
        let list = vec![
            recipe("1", "Margarita", &["tequila"]),
            recipe("2", "Mojito", &["white rum"]),
        ];
        let mut doubled = list.clone();
        doubled.extend(list.clone());

        let ids: Vec<String> = dedupe_by_id(doubled).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn dedupe_by_name_spans_sources() {
        let merged = vec![
            recipe("11007", "Margarita", &["tequila"]),
            recipe("local-7", "MARGARITA!", &["tequila"]),
            recipe("", "", &[]),
        ];
        let deduped = dedupe_by_name(merged);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].id, "11007");
    }

    #[test]
    fn availability_requires_a_defining_ingredient() {
        let owned = vec!["vodka".to_string()];
        let mixer_only = recipe("1", "Ice Water", &["water", "ice"]);
        assert!(!Aggregator::is_available(&mixer_only, &owned));

        let vodka_soda = recipe("2", "Vodka Soda", &["vodka", "lime", "soda water"]);
        assert!(Aggregator::is_available(&vodka_soda, &owned));

        let needs_gin = recipe("3", "Gimlet", &["gin", "lime"]);
        assert!(!Aggregator::is_available(&needs_gin, &owned));
    }
}
