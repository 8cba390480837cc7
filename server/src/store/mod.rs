//! Persistence for recipes and their ingredients.
//!
//! [`RecipeStore`] is the seam between the HTTP handlers and storage. The
//! Postgres implementation is used in production; [`MemoryRecipeStore`] backs
//! the tests and `--store memory` local runs.

mod memory;
mod postgres;

pub use memory::MemoryRecipeStore;
pub use postgres::PgRecipeStore;

use crate::models::{Ingredient, RecipeRecord};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Recipe not found")]
    RecipeNotFound,

    #[error("Ingredient not found")]
    IngredientNotFound,

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Validated input for a new recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipeData {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<NewIngredientData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredientData {
    pub name: String,
}

/// Validated changes to an existing recipe. `None` leaves the field as stored;
/// `Some` ingredients replace the whole ingredient list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<NewIngredientData>>,
}

/// Window over the recipe listing, which is ordered by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

pub trait RecipeStore: Send + Sync {
    fn list(&self, page: Page) -> Result<Vec<RecipeRecord>, StoreError>;

    fn get(&self, id: Uuid) -> Result<RecipeRecord, StoreError>;

    /// Persists the recipe and all of its ingredients atomically.
    fn create(&self, data: NewRecipeData) -> Result<RecipeRecord, StoreError>;

    fn update(&self, id: Uuid, changes: RecipeChanges) -> Result<RecipeRecord, StoreError>;

    /// Removes the recipe together with its ingredients.
    fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    fn list_ingredients(&self, recipe_id: Uuid) -> Result<Vec<Ingredient>, StoreError>;

    /// Appends an ingredient after the recipe's existing ones.
    fn add_ingredient(
        &self,
        recipe_id: Uuid,
        data: NewIngredientData,
    ) -> Result<Ingredient, StoreError>;

    fn delete_ingredient(&self, recipe_id: Uuid, ingredient_id: Uuid) -> Result<(), StoreError>;
}
