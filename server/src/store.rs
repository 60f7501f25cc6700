//! Postgres-backed recipe store: the read-through cache behind the
//! aggregator's "primary store" source.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use barcart_core::{CocktailRecipe, RecipeStore, StoreError};

use crate::db::DbPool;
use crate::models::{NewStoredRecipe, StoredRecipe};
use crate::schema::cocktail_recipes;

const SEARCH_LIMIT: i64 = 30;

pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
        self.pool
            .get()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn get(&self, id: &str) -> Result<Option<CocktailRecipe>, StoreError> {
        let mut conn = self.conn()?;
        match cocktail_recipes::table
            .find(id)
            .select(StoredRecipe::as_select())
            .first(&mut conn)
        {
            Ok(row) => Ok(Some(row.into_recipe())),
            Err(diesel::NotFound) => Ok(None),
            Err(e) => Err(StoreError::Query(e.to_string())),
        }
    }

    async fn search_name(&self, query: &str) -> Result<Vec<CocktailRecipe>, StoreError> {
        let mut conn = self.conn()?;
        let pattern = format!(
            "%{}%",
            query.replace('%', "\\%").replace('_', "\\_")
        );
        let rows: Vec<StoredRecipe> = cocktail_recipes::table
            .filter(cocktail_recipes::name.ilike(pattern))
            .limit(SEARCH_LIMIT)
            .select(StoredRecipe::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(rows.into_iter().map(StoredRecipe::into_recipe).collect())
    }

    async fn list(&self, limit: usize) -> Result<Vec<CocktailRecipe>, StoreError> {
        let mut conn = self.conn()?;
        let rows: Vec<StoredRecipe> = cocktail_recipes::table
            .limit(limit as i64)
            .select(StoredRecipe::as_select())
            .load(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(rows.into_iter().map(StoredRecipe::into_recipe).collect())
    }

    async fn insert_if_absent(&self, recipe: &CocktailRecipe) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let new_row = NewStoredRecipe::from_recipe(recipe)
            .map_err(|e| StoreError::Query(format!("failed to serialize recipe: {e}")))?;
        let inserted = diesel::insert_into(cocktail_recipes::table)
            .values(&new_row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(inserted > 0)
    }
}
