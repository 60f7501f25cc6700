use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use barcart_core::SearchResponse;

use crate::api::ErrorResponse;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailableParams {
    /// Comma-separated owned ingredient names, e.g. "vodka,lime,triple sec"
    pub ingredients: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/available",
    tag = "cocktails",
    params(AvailableParams),
    responses(
        (status = 200, description = "Cocktails fully makeable from the given ingredients", body = SearchResponse),
        (status = 500, description = "Aggregation failed", body = ErrorResponse)
    )
)]
pub async fn available_cocktails(
    State(state): State<AppState>,
    Query(params): Query<AvailableParams>,
) -> impl IntoResponse {
    let ingredients: Vec<String> = params
        .ingredients
        .unwrap_or_default()
        .split(',')
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect();

    if ingredients.is_empty() {
        return (StatusCode::OK, Json(SearchResponse { drinks: Vec::new() })).into_response();
    }

    let drinks = state.aggregator.available_cocktails(&ingredients).await;
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "public, max-age=1800")],
        Json(SearchResponse { drinks }),
    )
        .into_response()
}

#[derive(OpenApi)]
#[openapi(paths(available_cocktails))]
pub struct ApiDoc;
