//! Ingredient classification and availability matching.
//!
//! Decides whether a cocktail's required ingredient counts as "owned" given a
//! user's free-text inventory. Keyword and alias data is loaded from
//! `data/matcher.json` at compile time and never mutated.

use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// The raw JSON structure of the matcher data file.
#[derive(Deserialize)]
struct MatcherData {
    alcohol_keywords: Vec<String>,
    ignored_ingredients: Vec<String>,
    alias_groups: Vec<Vec<String>>,
}

static MATCHER_DATA: LazyLock<MatcherData> = LazyLock::new(|| {
    let json = include_str!("../data/matcher.json");
    serde_json::from_str(json).expect("Failed to parse matcher.json")
});

/// Normalize an ingredient name for matching: lowercase, trim, replace
/// `(`, `)`, `.`, `,` with spaces, collapse whitespace.
///
/// Idempotent: normalizing twice yields the same string as normalizing once.
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| match c {
            '(' | ')' | '.' | ',' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Stricter normalization used for cross-source dedup by drink name:
/// keeps only alphanumerics and single spaces.
pub fn normalize_display_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True iff the normalized name contains any alcohol keyword.
///
/// Coarse heuristic: "cream" does not match, "amaretto" does. The keyword
/// list is literal data in `data/matcher.json`.
pub fn is_alcoholic(name: &str) -> bool {
    let normalized = normalize(name);
    MATCHER_DATA
        .alcohol_keywords
        .iter()
        .any(|keyword| normalized.contains(keyword.as_str()))
}

/// True iff the normalized name equals or contains any ignored-ingredient
/// entry (mixers, garnishes, ice, common juices).
pub fn is_ignored(name: &str) -> bool {
    let normalized = normalize(name);
    MATCHER_DATA
        .ignored_ingredients
        .iter()
        .any(|ignored| normalized == *ignored || normalized.contains(ignored.as_str()))
}

/// Expand an ingredient name into the set of names it is interchangeable
/// with. Seeds with the normalized name itself; a bidirectional substring
/// test against each group member pulls in the whole group, so "rum" in a
/// recipe is satisfiable by "dark rum" and vice versa.
pub fn alias_candidates(name: &str) -> BTreeSet<String> {
    let normalized = normalize(name);
    let mut candidates = BTreeSet::new();
    candidates.insert(normalized.clone());
    for group in &MATCHER_DATA.alias_groups {
        let matches = group
            .iter()
            .any(|entry| normalized.contains(entry.as_str()) || entry.contains(&normalized));
        if matches {
            for entry in group {
                candidates.insert(entry.clone());
            }
        }
    }
    candidates
}

/// Test whether a cocktail's ingredient is satisfied by the user's inventory.
///
/// A candidate matches on exact equality with a normalized owned name, or on
/// containment in either direction ("scotch whiskey" vs. "scotch"). Both
/// directions are required; dropping one silently breaks compound-name
/// matches.
pub fn is_ingredient_available(cocktail_ingredient: &str, user_ingredients: &[String]) -> bool {
    let owned: Vec<String> = user_ingredients.iter().map(|s| normalize(s)).collect();
    let owned_set: HashSet<&str> = owned.iter().map(String::as_str).collect();

    for candidate in alias_candidates(cocktail_ingredient) {
        if owned_set.contains(candidate.as_str()) {
            return true;
        }
        if owned
            .iter()
            .any(|o| o.contains(candidate.as_str()) || candidate.contains(o.as_str()))
        {
            return true;
        }
    }

    false
}

/// Filter a recipe's ingredient list down to the names that must all be owned
/// for the recipe to be makeable: not ignored AND alcoholic, in that order.
/// Non-alcoholic mixers, garnishes, and water/ice never block a match.
pub fn required_owned_ingredients(ingredients: &[String]) -> Vec<String> {
    ingredients
        .iter()
        .filter(|ingredient| !is_ignored(ingredient) && is_alcoholic(ingredient))
        .map(|ingredient| normalize(ingredient))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("  White  Rum (Bacardi)  "), "white rum bacardi");
        assert_eq!(normalize("Lime, juiced."), "lime juiced");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["  Dark.  Rum ", "Scotch Whiskey", "(ice)", "7-Up", "피치 리큐르"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn display_name_normalization_drops_symbols() {
        assert_eq!(normalize_display_name("7-Up!"), "7up");
        assert_eq!(normalize_display_name("  Piña   Colada "), "piña colada");
    }

    #[test]
    fn classifies_alcohol_by_keyword_substring() {
        assert!(is_alcoholic("Vodka"));
        assert!(is_alcoholic("Spiced rum"));
        assert!(is_alcoholic("Amaretto"));
        assert!(!is_alcoholic("Cream"));
        assert!(!is_alcoholic("Lime juice"));
    }

    #[test]
    fn classifies_ignored_ingredients() {
        assert!(is_ignored("Ice"));
        assert!(is_ignored("crushed ice"));
        assert!(is_ignored("Orange Juice"));
        assert!(!is_ignored("gin"));
    }

    #[test]
    fn ignored_wins_over_alcoholic_when_computing_required() {
        let ingredients: Vec<String> = ["vodka", "lime", "soda water"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(required_owned_ingredients(&ingredients), vec!["vodka"]);
    }

    #[test]
    fn required_of_empty_is_empty() {
        assert!(required_owned_ingredients(&[]).is_empty());
    }

    #[test]
    fn alias_candidates_span_whole_group() {
        let candidates = alias_candidates("rum");
        assert!(candidates.contains("rum"));
        assert!(candidates.contains("dark rum"));
        assert!(candidates.contains("white rum"));

        let candidates = alias_candidates("orange liqueur");
        assert!(candidates.contains("triple sec"));
        assert!(candidates.contains("cointreau"));
    }

    #[test]
    fn availability_is_symmetric_within_alias_group() {
        let dark_rum = vec!["dark rum".to_string()];
        let rum = vec!["rum".to_string()];
        assert!(is_ingredient_available("rum", &dark_rum));
        assert!(is_ingredient_available("dark rum", &rum));
    }

    #[test]
    fn availability_matches_compound_names_in_both_directions() {
        let scotch = vec!["scotch".to_string()];
        assert!(is_ingredient_available("scotch whiskey", &scotch));

        let scotch_whiskey = vec!["scotch whiskey".to_string()];
        assert!(is_ingredient_available("scotch", &scotch_whiskey));
    }

    #[test]
    fn availability_rejects_unrelated_spirits() {
        let gin = vec!["gin".to_string()];
        assert!(!is_ingredient_available("vodka", &gin));
    }

    #[test]
    fn availability_handles_unnormalized_input() {
        let owned = vec!["  VODKA ".to_string()];
        assert!(is_ingredient_available("Vodka (premium)", &owned));
    }
}
