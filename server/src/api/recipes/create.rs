use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::serializer::{self, RecipeRequest, RecipeResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

#[utoipa::path(
    post,
    path = "/recipes/",
    tag = "recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(store): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let data = serializer::validate_create(&payload)?;

    let record = store.create(data)?;
    tracing::debug!(
        recipe_id = %record.recipe.id,
        ingredients = record.ingredients.len(),
        "Created recipe"
    );

    Ok((StatusCode::CREATED, Json(serializer::render(&record))))
}
