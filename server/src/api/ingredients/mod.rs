pub mod create;
pub mod delete;
pub mod list;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for ingredients nested under /recipes/{id}
pub fn router() -> Router<AppState> {
    let collection = get(list::list_ingredients).post(create::create_ingredient);
    let member = delete(delete::delete_ingredient);

    Router::new()
        .route("/recipes/{id}/ingredients", collection.clone())
        .route("/recipes/{id}/ingredients/", collection)
        .route("/recipes/{id}/ingredients/{ingredient_id}", member.clone())
        .route("/recipes/{id}/ingredients/{ingredient_id}/", member)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_ingredients,
        create::create_ingredient,
        delete::delete_ingredient,
    ),
    components(schemas(
        crate::serializer::IngredientRequest,
        crate::serializer::IngredientResponse,
    ))
)]
pub struct ApiDoc;
