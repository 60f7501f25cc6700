use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa::OpenApi;

use barcart_core::{classify_recipe_id, RecipeIdKind, SearchResponse};

use crate::api::ErrorResponse;
use crate::AppState;

/// One endpoint, two modes, matching the id shape: a numeric or prefixed id
/// is a detail lookup, anything else is treated as a name search.
#[utoipa::path(
    get,
    path = "/api/search/{id}",
    tag = "cocktails",
    params(
        ("id" = String, Path, description = "Recipe id (numeric, local-, ninja-, custom-) or a search term")
    ),
    responses(
        (status = 200, description = "Matching recipes", body = SearchResponse),
        (status = 400, description = "Empty id", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn search_or_lookup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = id.trim().to_string();
    if id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "ID is required".to_string(),
            }),
        )
            .into_response();
    }

    if classify_recipe_id(&id) != RecipeIdKind::Unknown {
        return match state.aggregator.recipe_by_id(&id).await {
            Some(recipe) => (
                StatusCode::OK,
                [(
                    header::CACHE_CONTROL,
                    "public, max-age=86400, stale-while-revalidate=604800",
                )],
                Json(SearchResponse {
                    drinks: vec![recipe],
                }),
            )
                .into_response(),
            // Terminal after all sources were exhausted; not retried.
            None => (
                StatusCode::NOT_FOUND,
                [(header::CACHE_CONTROL, "public, max-age=3600")],
                Json(ErrorResponse {
                    error: "Cocktail not found".to_string(),
                }),
            )
                .into_response(),
        };
    }

    let drinks = state.aggregator.search(&id).await;
    (
        StatusCode::OK,
        [(
            header::CACHE_CONTROL,
            "public, max-age=3600, stale-while-revalidate=86400",
        )],
        Json(SearchResponse { drinks }),
    )
        .into_response()
}

#[derive(OpenApi)]
#[openapi(paths(search_or_lookup))]
pub struct ApiDoc;
