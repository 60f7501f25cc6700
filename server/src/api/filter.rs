use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use barcart_core::RecipeStub;

use crate::api::ErrorResponse;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct FilterParams {
    /// Comma-separated ingredient names to filter by, e.g. "vodka,lime"
    pub ingredients: Option<String>,
}

/// Stub list for browse views. A stub that matched more than one queried
/// ingredient carries the extra ingredients appended to its display name;
/// ids resolve to full recipes via `/api/search/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterResponse {
    pub drinks: Vec<RecipeStub>,
}

#[utoipa::path(
    get,
    path = "/api/filter",
    tag = "cocktails",
    params(FilterParams),
    responses(
        (status = 200, description = "Recipes matching any of the given ingredients", body = FilterResponse),
        (status = 500, description = "Aggregation failed", body = ErrorResponse)
    )
)]
pub async fn filter_by_ingredients(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> impl IntoResponse {
    let ingredients: Vec<String> = params
        .ingredients
        .unwrap_or_default()
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect();

    if ingredients.is_empty() {
        return (StatusCode::OK, Json(FilterResponse { drinks: Vec::new() })).into_response();
    }

    let drinks = state.aggregator.cocktails_by_ingredients(&ingredients).await;
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "public, max-age=1800")],
        Json(FilterResponse { drinks }),
    )
        .into_response()
}

#[derive(OpenApi)]
#[openapi(paths(filter_by_ingredients), components(schemas(FilterResponse)))]
pub struct ApiDoc;
