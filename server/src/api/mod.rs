pub mod available;
pub mod filter;
pub mod recipes;
pub mod search;
pub mod testing;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::AppState;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Returns the full API router (mounted at /)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/available", get(available::available_cocktails))
        .route("/api/filter", get(filter::filter_by_ingredients))
        .route("/api/search/{id}", get(search::search_or_lookup))
        .route("/api/recipes", post(recipes::create_recipe))
        .route("/api/test/ping", get(testing::ping))
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(components(schemas(
        ErrorResponse,
        barcart_core::CocktailRecipe,
        barcart_core::IngredientSlot,
        barcart_core::RecipeStub,
        barcart_core::SearchResponse,
    )))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        available::ApiDoc::openapi(),
        filter::ApiDoc::openapi(),
        search::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        testing::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
