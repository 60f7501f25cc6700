//! Offline dataset harvester.
//!
//! Builds the bundled `data/cocktails.json` document from the public
//! CocktailDB API (paginated by first letter) plus a supplementary open
//! dataset, deduplicated by normalized drink name. Run rarely, offline from
//! the serving path.

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

use barcart_core::aggregator::dedupe_by_name;
use barcart_core::matcher::is_alcoholic;
use barcart_core::sources::NINJA_FALLBACK_THUMBNAIL;
use barcart_core::{CocktailApi, CocktailDbClient, CocktailRecipe, DatasetDocument};

const HF_DATASET: &str = "erwanlc/cocktails_recipe_no_brand";
const HF_BATCH_SIZE: usize = 100;
const HF_FETCH_LIMIT: usize = 2500;

/// `['1.5 oz', 'white rum']` pairs inside the supplementary dataset's
/// ingredient column.
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\['([^']*)'\s*,\s*'([^']*)'\]").expect("valid ingredient pair regex")
});

#[derive(Deserialize, Default)]
#[serde(default)]
struct RowsEnvelope {
    rows: Vec<RowWrapper>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RowWrapper {
    row: HfRow,
    row_idx: u64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct HfRow {
    title: String,
    raw_ingredients: Option<String>,
    ingredients: Option<String>,
    glass: Option<String>,
    recipe: Option<String>,
}

pub async fn generate_dataset(out: &Path, target: usize) -> Result<()> {
    let client = CocktailDbClient::new().context("failed to build CocktailDB client")?;

    let mut recipes = harvest_cocktail_db(&client).await;
    tracing::info!(count = recipes.len(), "harvested CocktailDB recipes");

    let supplemental = harvest_supplemental(HF_FETCH_LIMIT).await?;
    tracing::info!(count = supplemental.len(), "harvested supplementary recipes");
    recipes.extend(supplemental);

    let mut merged = dedupe_by_name(recipes);
    merged.truncate(target);
    if merged.len() < target {
        bail!("not enough recipes after dedupe: {}/{}", merged.len(), target);
    }

    let document = DatasetDocument {
        generated_at: Some(chrono::Utc::now().to_rfc3339()),
        count: merged.len(),
        sources: vec!["thecocktaildb".to_string(), "huggingface".to_string()],
        drinks: merged,
    };

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string(&document)?;
    std::fs::write(out, json).with_context(|| format!("failed to write {}", out.display()))?;

    println!("Generated {} recipes at {}", document.count, out.display());
    Ok(())
}

/// One request per first letter; a failed letter is logged and skipped so a
/// flaky page doesn't sink the whole harvest.
async fn harvest_cocktail_db(client: &CocktailDbClient) -> Vec<CocktailRecipe> {
    let mut recipes = Vec::new();
    for letter in 'a'..='z' {
        match client.search_by_first_letter(letter).await {
            Ok(batch) => recipes.extend(batch),
            Err(e) => {
                tracing::warn!(%letter, error = %e, "letter page failed, skipping");
            }
        }
    }
    recipes
}

async fn harvest_supplemental(limit: usize) -> Result<Vec<CocktailRecipe>> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent("barcart/0.1")
        .build()?;

    let mut results = Vec::new();
    let mut offset = 0usize;
    while results.len() < limit {
        let offset_param = offset.to_string();
        let length_param = HF_BATCH_SIZE.to_string();
        let envelope: RowsEnvelope = client
            .get("https://datasets-server.huggingface.co/rows")
            .query(&[
                ("dataset", HF_DATASET),
                ("config", "default"),
                ("split", "train"),
                ("offset", offset_param.as_str()),
                ("length", length_param.as_str()),
            ])
            .send()
            .await
            .context("supplementary dataset request failed")?
            .error_for_status()
            .context("supplementary dataset returned an error")?
            .json()
            .await
            .context("invalid supplementary dataset response")?;

        if envelope.rows.is_empty() {
            break;
        }

        for wrapper in &envelope.rows {
            if results.len() >= limit {
                break;
            }
            if let Some(recipe) = map_hf_row(wrapper) {
                results.push(recipe);
            }
        }
        offset += HF_BATCH_SIZE;
    }

    Ok(results)
}

fn map_hf_row(wrapper: &RowWrapper) -> Option<CocktailRecipe> {
    let row = &wrapper.row;
    let title = row.title.trim();
    if title.is_empty() {
        return None;
    }

    let raw = row
        .raw_ingredients
        .as_deref()
        .or(row.ingredients.as_deref())
        .unwrap_or_default();
    let pairs = parse_ingredient_pairs(raw);
    if pairs.is_empty() {
        return None;
    }

    let ingredient_names: Vec<String> = pairs.iter().map(|(_, name)| name.clone()).collect();
    let alcoholic = if ingredient_names.iter().any(|name| is_alcoholic(name)) {
        "Alcoholic"
    } else {
        "Non alcoholic"
    };

    let mut recipe = CocktailRecipe::new(format!("local-hf-{}", wrapper.row_idx), title);
    recipe.category = "Static Collection".to_string();
    recipe.alcoholic = alcoholic.to_string();
    recipe.glass = row
        .glass
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or("Cocktail glass")
        .to_string();
    recipe.instructions = row
        .recipe
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("No instructions provided.")
        .to_string();
    recipe.thumbnail = NINJA_FALLBACK_THUMBNAIL.to_string();
    recipe.image_source = Some("HuggingFace".to_string());
    for (measure, ingredient) in pairs {
        let measure = if measure.is_empty() { None } else { Some(measure) };
        recipe.push_ingredient(&ingredient, measure);
    }
    Some(recipe)
}

/// Parse `['measure', 'ingredient']` pairs; entries with an empty ingredient
/// are dropped.
fn parse_ingredient_pairs(value: &str) -> Vec<(String, String)> {
    PAIR_RE
        .captures_iter(value)
        .filter_map(|caps| {
            let measure = caps[1].trim().to_string();
            let ingredient = caps[2].trim().to_string();
            if ingredient.is_empty() {
                None
            } else {
                Some((measure, ingredient))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_measure_ingredient_pairs() {
        let raw = "[['1.5 oz', 'white rum'], ['', 'mint'], ['2 dashes', '']]";
        let pairs = parse_ingredient_pairs(raw);
        assert_eq!(
            pairs,
            vec![
                ("1.5 oz".to_string(), "white rum".to_string()),
                ("".to_string(), "mint".to_string()),
            ]
        );
    }

    #[test]
    fn dedupes_by_normalized_name() {
        let recipes = vec![
            CocktailRecipe::new("1", "Mai Tai"),
            CocktailRecipe::new("2", "MAI  TAI!"),
            CocktailRecipe::new("3", ""),
            CocktailRecipe::new("4", "Zombie"),
        ];
        let merged = dedupe_by_name(recipes);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn hf_rows_without_usable_fields_are_dropped() {
        let wrapper = RowWrapper {
            row: HfRow {
                title: "Test".to_string(),
                raw_ingredients: Some("no pairs here".to_string()),
                ..HfRow::default()
            },
            row_idx: 7,
        };
        assert!(map_hf_row(&wrapper).is_none());

        let wrapper = RowWrapper {
            row: HfRow {
                title: "Daiquiri".to_string(),
                raw_ingredients: Some("[['2 oz', 'white rum'], ['1 oz', 'lime juice']]".to_string()),
                recipe: Some("Shake with ice.".to_string()),
                ..HfRow::default()
            },
            row_idx: 9,
        };
        let recipe = map_hf_row(&wrapper).unwrap();
        assert_eq!(recipe.id, "local-hf-9");
        assert_eq!(recipe.alcoholic, "Alcoholic");
        assert_eq!(recipe.ingredients.len(), 2);
    }
}
