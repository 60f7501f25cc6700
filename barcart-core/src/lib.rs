pub mod aggregator;
pub mod dataset;
pub mod error;
pub mod inventory;
pub mod matcher;
pub mod measure;
pub mod sources;
pub mod store;
pub mod types;

pub use aggregator::{Aggregator, AggregatorConfig};
pub use dataset::{DatasetDocument, StaticDataset};
pub use error::{DatasetError, FetchError, StoreError};
pub use inventory::{Category, Inventory, InventoryItem};
pub use sources::{CocktailApi, CocktailDbClient, NinjaApi, NinjaClient, RecipeStub};
pub use store::{MemoryStore, RecipeStore};
pub use types::{
    classify_recipe_id, CocktailRecipe, CustomRecipeInput, IngredientSlot, RecipeIdKind,
    SearchResponse, CUSTOM_ID_PREFIX, LOCAL_ID_PREFIX, MAX_INGREDIENT_SLOTS, NINJA_ID_PREFIX,
};
