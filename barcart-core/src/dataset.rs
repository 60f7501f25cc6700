//! The bundled static recipe dataset.
//!
//! An explicit, injected object: callers construct it once at startup and
//! hand it to the aggregator. A missing or broken dataset file degrades to an
//! empty dataset so the service stays usable without it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::DatasetError;
use crate::matcher::normalize_display_name;
use crate::types::CocktailRecipe;

/// The on-disk dataset document produced by the harvester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub drinks: Vec<CocktailRecipe>,
}

/// In-memory static dataset with id and name indexes.
#[derive(Debug, Default)]
pub struct StaticDataset {
    drinks: Vec<CocktailRecipe>,
    by_id: HashMap<String, usize>,
}

impl StaticDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_drinks(drinks: Vec<CocktailRecipe>) -> Self {
        let by_id = drinks
            .iter()
            .enumerate()
            .map(|(index, drink)| (drink.id.clone(), index))
            .collect();
        Self { drinks, by_id }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        let document: DatasetDocument = serde_json::from_slice(bytes)?;
        Ok(Self::from_drinks(document.drinks))
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Load the dataset, degrading to an empty one on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(dataset) => {
                tracing::info!(path = %path.display(), drinks = dataset.len(), "loaded static dataset");
                dataset
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "static dataset unavailable, starting empty");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.drinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty()
    }

    pub fn drinks(&self) -> &[CocktailRecipe] {
        &self.drinks
    }

    pub fn get(&self, id: &str) -> Option<&CocktailRecipe> {
        self.by_id.get(id).map(|&index| &self.drinks[index])
    }

    /// Substring search on normalized display names.
    pub fn search_name(&self, query: &str) -> Vec<&CocktailRecipe> {
        let needle = normalize_display_name(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.drinks
            .iter()
            .filter(|drink| normalize_display_name(&drink.name).contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StaticDataset {
        let document = serde_json::json!({
            "generated_at": "2026-01-10T00:00:00Z",
            "count": 2,
            "sources": ["thecocktaildb"],
            "drinks": [
                {"id": "local-1", "name": "Moscow Mule", "ingredients": [{"ingredient": "vodka"}]},
                {"id": "11007", "name": "Margarita", "ingredients": [{"ingredient": "tequila"}]}
            ]
        });
        StaticDataset::from_slice(document.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn indexes_by_id() {
        let dataset = sample();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get("local-1").unwrap().name, "Moscow Mule");
        assert!(dataset.get("nope").is_none());
    }

    #[test]
    fn search_ignores_case_and_symbols() {
        let dataset = sample();
        let hits = dataset.search_name("MOSCOW");
        assert_eq!(hits.len(), 1);
        assert!(dataset.search_name("").is_empty());
    }

    #[test]
    fn rejects_invalid_documents() {
        assert!(StaticDataset::from_slice(b"{not json").is_err());
    }

    #[test]
    fn load_or_empty_degrades() {
        let dataset = StaticDataset::load_or_empty(Path::new("/definitely/not/here.json"));
        assert!(dataset.is_empty());
    }
}
