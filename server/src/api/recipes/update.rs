use crate::api::{ApiError, ErrorResponse, ValidationErrorResponse};
use crate::serializer::{self, RecipeRequest, RecipeResponse};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::Value;
use uuid::Uuid;

/// Resolves the recipe before looking at the body, so an unknown id is a 404
/// whatever the payload holds.
fn apply_update(
    store: &AppState,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
    partial: bool,
) -> Result<Json<RecipeResponse>, ApiError> {
    let Path(id) = id?;
    store.get(id)?;

    let Json(payload) = payload?;
    let changes = serializer::validate_update(&payload, partial)?;

    let record = store.update(id, changes)?;
    tracing::debug!(recipe_id = %id, partial, "Updated recipe");

    Ok(Json(serializer::render(&record)))
}

/// Partial update: fields missing from the body keep their stored values.
#[utoipa::path(
    patch,
    path = "/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn update_recipe(
    State(store): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    apply_update(&store, id, payload, true)
}

/// Full update: `name` and `description` are required.
#[utoipa::path(
    put,
    path = "/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ValidationErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn replace_recipe(
    State(store): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    apply_update(&store, id, payload, false)
}
