use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::serializer::{self, IngredientRequest, IngredientResponse};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/recipes/{id}/ingredients/",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = IngredientRequest,
    responses(
        (status = 201, description = "Ingredient appended to the recipe", body = IngredientResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn create_ingredient(
    State(store): State<AppState>,
    recipe_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(recipe_id) = recipe_id?;
    let Json(payload) = payload?;
    let data = serializer::validate_ingredient(&payload)?;

    let ingredient = store.add_ingredient(recipe_id, data)?;
    tracing::debug!(
        recipe_id = %recipe_id,
        ingredient_id = %ingredient.id,
        "Added ingredient"
    );

    Ok((
        StatusCode::CREATED,
        Json(serializer::render_ingredient(&ingredient)),
    ))
}
