//! External recipe sources behind seam traits, so the aggregator can be
//! exercised against mocks.

mod cocktaildb;
mod ninjas;

pub use cocktaildb::{
    CocktailApi, CocktailDbClient, MockCocktailApi, RecipeStub, COCKTAIL_DB_BASE_URL,
};
pub use ninjas::{
    build_ninja_id, extract_ingredient_name, infer_name_from_id, lookup_by_ninja_id, slugify,
    stable_hash, MockNinjaApi, NinjaApi, NinjaClient, NINJA_BASE_URL, NINJA_FALLBACK_THUMBNAIL,
};
