pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /recipes endpoints. Each path is served with and
/// without its trailing slash.
pub fn router() -> Router<AppState> {
    let collection = get(list::list_recipes).post(create::create_recipe);
    let member = get(get::get_recipe)
        .put(update::replace_recipe)
        .patch(update::update_recipe)
        .delete(delete::delete_recipe);

    Router::new()
        .route("/recipes", collection.clone())
        .route("/recipes/", collection)
        .route("/recipes/{id}", member.clone())
        .route("/recipes/{id}/", member)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        update::replace_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        crate::serializer::RecipeRequest,
        crate::serializer::IngredientRequest,
        crate::serializer::RecipeResponse,
        crate::serializer::IngredientResponse,
    ))
)]
pub struct ApiDoc;
