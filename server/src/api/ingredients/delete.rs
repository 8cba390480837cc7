use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/recipes/{id}/ingredients/{ingredient_id}/",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Recipe ID"),
        ("ingredient_id" = Uuid, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 404, description = "Recipe or ingredient not found", body = ErrorResponse)
    )
)]
pub async fn delete_ingredient(
    State(store): State<AppState>,
    ids: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((recipe_id, ingredient_id)) = ids?;
    store.delete_ingredient(recipe_id, ingredient_id)?;
    Ok(StatusCode::NO_CONTENT)
}
