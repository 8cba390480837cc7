use crate::api::{ApiError, ErrorResponse};
use crate::serializer::{self, RecipeResponse};
use crate::store::Page;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Largest page a client may request.
pub const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// Number of items to return (max: 1000). All recipes when omitted.
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

impl ListRecipesParams {
    fn page(&self) -> Result<Page, ApiError> {
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::BadRequest(
                "offset must not be negative".to_string(),
            ));
        }

        if let Some(limit) = self.limit {
            if !(1..=MAX_LIMIT).contains(&limit) {
                return Err(ApiError::BadRequest(format!(
                    "limit must be between 1 and {MAX_LIMIT}"
                )));
            }
        }

        Ok(Page {
            limit: self.limit,
            offset,
        })
    }
}

#[utoipa::path(
    get,
    path = "/recipes/",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes in creation order", body = Vec<RecipeResponse>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(store): State<AppState>,
    params: Result<Query<ListRecipesParams>, QueryRejection>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let Query(params) = params?;
    let page = params.page()?;

    let records = store.list(page)?;

    Ok(Json(records.iter().map(serializer::render).collect()))
}
