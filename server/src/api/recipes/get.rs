use crate::api::{ApiError, ErrorResponse};
use crate::serializer::{self, RecipeResponse};
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(store): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let Path(id) = id?;
    let record = store.get(id)?;
    Ok(Json(serializer::render(&record)))
}
