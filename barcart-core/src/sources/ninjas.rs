//! Client for the secondary, key-gated recipe API.
//!
//! Records come back as bare `{name, ingredients, instructions}` rows, so a
//! deterministic synthetic id is derived from the name and ingredient list:
//! repeated fetches of the same recipe produce the same identity, which is
//! what makes downstream caching and dedup work. The hash is a 32-bit rolling
//! hash; collisions degrade to an occasional wrong cache hit, not corruption.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::FetchError;
use crate::types::{CocktailRecipe, NINJA_ID_PREFIX};

pub const NINJA_BASE_URL: &str = "https://api.api-ninjas.com/v1";

/// Placeholder thumbnail for sources that don't provide imagery.
pub const NINJA_FALLBACK_THUMBNAIL: &str =
    "https://images.unsplash.com/photo-1514362545857-3bc16c4c7d1b?auto=format&fit=crop&w=800&q=80";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

static LEADING_QUANTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[./]\d+)?\s*").expect("valid quantity regex"));

static LEADING_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(oz|ml|cl|cup|cups|tbsp|tsp|dash|dashes|part|parts|slice|slices|leaf|leaves|piece|pieces)\s+")
        .expect("valid unit regex")
});

/// The secondary, name-search-only recipe API.
#[async_trait]
pub trait NinjaApi: Send + Sync {
    async fn search_by_name(&self, name: &str) -> Result<Vec<CocktailRecipe>, FetchError>;
}

/// Production client; requires an API key.
pub struct NinjaClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl NinjaClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(NINJA_BASE_URL, api_key)
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("barcart/0.1")
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait]
impl NinjaApi for NinjaClient {
    async fn search_by_name(&self, name: &str) -> Result<Vec<CocktailRecipe>, FetchError> {
        let url = format!("{}/cocktail", self.base_url);
        tracing::debug!(%url, name, "ninja request");
        let rows: Vec<NinjaRow> = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows.into_iter().filter_map(map_ninja_row).collect())
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct NinjaRow {
    name: Option<String>,
    ingredients: Option<Vec<String>>,
    instructions: Option<String>,
}

/// Rows missing a name, ingredients, or instructions are unusable and skipped.
fn map_ninja_row(row: NinjaRow) -> Option<CocktailRecipe> {
    let name = row.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
    let instructions = row
        .instructions
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())?;
    let raw_ingredients: Vec<&str> = row
        .ingredients
        .as_deref()?
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if raw_ingredients.is_empty() {
        return None;
    }

    let cleaned: Vec<String> = raw_ingredients
        .iter()
        .map(|raw| extract_ingredient_name(raw))
        .filter(|name| !name.is_empty())
        .collect();

    let mut recipe = CocktailRecipe::new(build_ninja_id(name, &cleaned), name);
    recipe.category = "API Ninjas".to_string();
    recipe.alcoholic = "Alcoholic".to_string();
    recipe.glass = "Cocktail glass".to_string();
    recipe.instructions = instructions.to_string();
    recipe.thumbnail = NINJA_FALLBACK_THUMBNAIL.to_string();
    recipe.tags = Some("api-ninjas".to_string());
    recipe.image_source = Some("API Ninjas".to_string());
    for ingredient in &cleaned {
        recipe.push_ingredient(ingredient, None);
    }
    Some(recipe)
}

/// Strip a leading quantity ("1", "1/2", "1.5") and unit word from a raw
/// ingredient string, lowercased: `"1.5 oz White Rum"` becomes `"white rum"`.
pub fn extract_ingredient_name(raw: &str) -> String {
    let trimmed = raw.trim().to_lowercase();
    let without_quantity = LEADING_QUANTITY_RE.replace(&trimmed, "");
    let without_unit = LEADING_UNIT_RE.replace(&without_quantity, "");
    without_unit.trim().to_string()
}

/// Lowercased, alphanumerics and dashes only, spaces collapsed to one dash.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let mut out = String::new();
    let mut previous_dash = false;
    for c in lowered.trim().chars() {
        let mapped = if c.is_whitespace() { '-' } else { c };
        if mapped == '-' {
            if !previous_dash && !out.is_empty() {
                out.push('-');
            }
            previous_dash = true;
        } else if mapped.is_ascii_lowercase() || mapped.is_ascii_digit() {
            out.push(mapped);
            previous_dash = false;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// 32-bit rolling hash (`h*31 + c` with wraparound), absolute value,
/// base-36 encoded. Deterministic across runs; collision-tolerant.
pub fn stable_hash(value: &str) -> String {
    let mut hash: i32 = 0;
    for c in value.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(c as i32);
    }
    base36(u64::from(hash.unsigned_abs()))
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ascii")
}

/// `ninja-<slug>-<hash>` where the hash covers the name and the full
/// ingredient list.
pub fn build_ninja_id(name: &str, ingredients: &[String]) -> String {
    let fingerprint = format!("{name}|{}", ingredients.join("|"));
    format!("{NINJA_ID_PREFIX}{}-{}", slugify(name), stable_hash(&fingerprint))
}

/// Recover the searchable display name from a synthetic id by dropping the
/// prefix and the trailing hash segment.
pub fn infer_name_from_id(id: &str) -> Option<String> {
    let without_prefix = id.strip_prefix(NINJA_ID_PREFIX)?;
    let slug = match without_prefix.rfind('-') {
        Some(index) => &without_prefix[..index],
        None => without_prefix,
    };
    let name = slug.replace('-', " ").trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Resolve a ninja id by searching for its inferred name: prefer the
/// candidate whose derived id matches exactly, fall back to the first hit.
pub async fn lookup_by_ninja_id(
    api: &dyn NinjaApi,
    id: &str,
) -> Result<Option<CocktailRecipe>, FetchError> {
    let Some(name) = infer_name_from_id(id) else {
        return Ok(None);
    };
    let candidates = api.search_by_name(&name).await?;
    let exact = candidates.iter().find(|candidate| candidate.id == id).cloned();
    Ok(exact.or_else(|| candidates.into_iter().next()))
}

/// Mock for tests: canned search results keyed by query.
#[derive(Default)]
pub struct MockNinjaApi {
    by_name: HashMap<String, Vec<CocktailRecipe>>,
    failing: bool,
}

impl MockNinjaApi {
    pub fn new() -> Self {
        Self::default()
    }

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
}

#[async_trait]
impl NinjaApi for MockNinjaApi {
    async fn search_by_name(&self, name: &str) -> Result<Vec<CocktailRecipe>, FetchError> {
        if self.failing {
            return Err(FetchError::InvalidRequest("mock failure".to_string()));
        }
        Ok(self.by_name.get(name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_deterministic() {
        let ingredients = vec!["white rum".to_string(), "mint".to_string()];
        let first = build_ninja_id("Mojito", &ingredients);
        let second = build_ninja_id("Mojito", &ingredients);
        assert_eq!(first, second);
        assert!(first.starts_with("ninja-mojito-"));

        let other = build_ninja_id("Mojito", &["dark rum".to_string()]);
        assert_ne!(first, other);
    }

    #[test]
    fn slugify_collapses_and_strips() {
        assert_eq!(slugify("Piña  Colada"), "pia-colada");
        assert_eq!(slugify("  B-52  "), "b-52");
        assert_eq!(slugify("Mai Tai!"), "mai-tai");
    }

    #[test]
    fn inferred_name_round_trips_through_the_id() {
        let id = build_ninja_id("Mai Tai", &["rum".to_string()]);
        assert_eq!(infer_name_from_id(&id).as_deref(), Some("mai tai"));
        assert!(infer_name_from_id("ninja-").is_none());
        assert!(infer_name_from_id("11007").is_none());
    }

    #[test]
    fn extracts_ingredient_names_from_measures() {
        assert_eq!(extract_ingredient_name("1.5 oz White Rum"), "white rum");
        assert_eq!(extract_ingredient_name("1/2 cup sugar"), "sugar");
        assert_eq!(extract_ingredient_name("2 dashes bitters"), "bitters");
        assert_eq!(extract_ingredient_name("Mint leaves"), "mint leaves");
    }

    #[test]
    fn unusable_rows_are_skipped() {
        assert!(map_ninja_row(NinjaRow::default()).is_none());
        assert!(map_ninja_row(NinjaRow {
            name: Some("No instructions".to_string()),
            ingredients: Some(vec!["rum".to_string()]),
            instructions: Some("  ".to_string()),
        })
        .is_none());

        let mapped = map_ninja_row(NinjaRow {
            name: Some("Mojito".to_string()),
            ingredients: Some(vec!["2 oz white rum".to_string(), "mint".to_string()]),
            instructions: Some("Muddle and build.".to_string()),
        })
        .unwrap();
        assert_eq!(mapped.ingredients.len(), 2);
        assert_eq!(mapped.ingredients[0].ingredient, "white rum");
    }

    #[tokio::test]
    async fn lookup_prefers_exact_id_match() {
        let wanted = map_ninja_row(NinjaRow {
            name: Some("Mai Tai".to_string()),
            ingredients: Some(vec!["dark rum".to_string()]),
            instructions: Some("Shake.".to_string()),
        })
        .unwrap();
        let decoy = map_ninja_row(NinjaRow {
            name: Some("Mai Tai".to_string()),
            ingredients: Some(vec!["light rum".to_string()]),
            instructions: Some("Shake.".to_string()),
        })
        .unwrap();

        let mock =
            MockNinjaApi::new().with_search("mai tai", vec![decoy.clone(), wanted.clone()]);
        let resolved = lookup_by_ninja_id(&mock, &wanted.id).await.unwrap().unwrap();
        assert_eq!(resolved.id, wanted.id);

        // Unknown hash still resolves to the first candidate.
        let resolved = lookup_by_ninja_id(&mock, "ninja-mai-tai-zzz")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, decoy.id);
    }
}
