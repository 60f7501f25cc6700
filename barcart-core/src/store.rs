//! The recipe store: a read-through cache of resolved recipes.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;
use crate::matcher::normalize_display_name;
use crate::types::CocktailRecipe;

/// Persistent recipe cache keyed by recipe id.
///
/// Inserts are at-most-once: an existing recipe is never overwritten.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Point lookup by id.
    async fn get(&self, id: &str) -> Result<Option<CocktailRecipe>, StoreError>;

    /// Case-insensitive substring search by display name.
    async fn search_name(&self, query: &str) -> Result<Vec<CocktailRecipe>, StoreError>;

    /// Up to `limit` cached recipes.
    async fn list(&self, limit: usize) -> Result<Vec<CocktailRecipe>, StoreError>;

    /// Insert if no recipe with this id exists. Returns whether a row was
    /// actually inserted.
    async fn insert_if_absent(&self, recipe: &CocktailRecipe) -> Result<bool, StoreError>;
}

/// In-memory store used in tests and store-less embeddings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: DashMap<String, CocktailRecipe>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<CocktailRecipe>, StoreError> {
        Ok(self.recipes.get(id).map(|entry| entry.clone()))
    }

    async fn search_name(&self, query: &str) -> Result<Vec<CocktailRecipe>, StoreError> {
        let needle = normalize_display_name(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .recipes
            .iter()
            .filter(|entry| normalize_display_name(&entry.name).contains(&needle))
            .map(|entry| entry.clone())
            .collect())
    }

    async fn list(&self, limit: usize) -> Result<Vec<CocktailRecipe>, StoreError> {
        Ok(self
            .recipes
            .iter()
            .take(limit)
            .map(|entry| entry.clone())
            .collect())
    }

    async fn insert_if_absent(&self, recipe: &CocktailRecipe) -> Result<bool, StoreError> {
        use dashmap::mapref::entry::Entry;

        match self.recipes.entry(recipe.id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(recipe.clone());
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, name: &str) -> CocktailRecipe {
        CocktailRecipe::new(id, name)
    }

    #[tokio::test]
    async fn insert_is_at_most_once() {
        let store = MemoryStore::new();
        let original = recipe("11007", "Margarita");
        assert!(store.insert_if_absent(&original).await.unwrap());

        let imposter = recipe("11007", "Not A Margarita");
        assert!(!store.insert_if_absent(&imposter).await.unwrap());

        let cached = store.get("11007").await.unwrap().unwrap();
        assert_eq!(cached.name, "Margarita");
    }

    #[tokio::test]
    async fn search_matches_substrings() {
        let store = MemoryStore::new();
        store.insert_if_absent(&recipe("1", "Moscow Mule")).await.unwrap();
        store.insert_if_absent(&recipe("2", "Mojito")).await.unwrap();

        let hits = store.search_name("mo").await.unwrap();
        assert_eq!(hits.len(), 2);
        let hits = store.search_name("mule").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(store.search_name("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert_if_absent(&recipe(&i.to_string(), &format!("Drink {i}")))
                .await
                .unwrap();
        }
        assert_eq!(store.list(3).await.unwrap().len(), 3);
        assert_eq!(store.list(100).await.unwrap().len(), 5);
    }
}
