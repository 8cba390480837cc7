use crate::api::{ApiError, ErrorResponse};
use crate::serializer::{self, IngredientResponse};
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/recipes/{id}/ingredients/",
    tag = "ingredients",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Ingredients in recipe order", body = Vec<IngredientResponse>),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(store): State<AppState>,
    recipe_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let Path(recipe_id) = recipe_id?;
    let ingredients = store.list_ingredients(recipe_id)?;
    Ok(Json(
        ingredients.iter().map(serializer::render_ingredient).collect(),
    ))
}
