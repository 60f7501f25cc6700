use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use barcart_core::CustomRecipeInput;

use crate::api::ErrorResponse;
use crate::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: String,
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CustomRecipeInput,
    responses(
        (status = 201, description = "Custom recipe created", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 503, description = "Recipe store not configured", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(request): Json<CustomRecipeInput>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Name cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    if request.instructions.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Instructions cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let has_ingredient = request
        .ingredients
        .iter()
        .any(|slot| !slot.ingredient.trim().is_empty());
    if !has_ingredient {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "At least one ingredient is required".to_string(),
            }),
        )
            .into_response();
    }

    let Some(store) = state.store.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Recipe store is not configured".to_string(),
            }),
        )
            .into_response();
    };

    let recipe = request.into_recipe(Utc::now());
    match store.insert_if_absent(&recipe).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(CreateRecipeResponse { id: recipe.id }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to save custom recipe");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(create_recipe),
    components(schemas(CreateRecipeResponse, CustomRecipeInput))
)]
pub struct ApiDoc;
