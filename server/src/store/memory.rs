use super::{NewIngredientData, NewRecipeData, Page, RecipeChanges, RecipeStore, StoreError};
use crate::models::{Ingredient, Recipe, RecipeRecord};
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

/// In-process store holding recipes in creation order.
///
/// Nothing survives a restart. Used by the HTTP tests and for running the
/// server without a database.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<Vec<RecipeRecord>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored recipes.
    pub fn len(&self) -> usize {
        self.recipes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.read().is_empty()
    }
}

fn new_ingredient(recipe_id: Uuid, data: NewIngredientData, position: i32) -> Ingredient {
    Ingredient {
        id: Uuid::new_v4(),
        recipe_id,
        name: data.name,
        position,
        created_at: Utc::now(),
    }
}

fn build_ingredients(recipe_id: Uuid, items: Vec<NewIngredientData>) -> Vec<Ingredient> {
    items
        .into_iter()
        .zip(0..)
        .map(|(item, position)| new_ingredient(recipe_id, item, position))
        .collect()
}

impl RecipeStore for MemoryRecipeStore {
    fn list(&self, page: Page) -> Result<Vec<RecipeRecord>, StoreError> {
        let recipes = self.recipes.read();

        let offset = usize::try_from(page.offset).unwrap_or(0);
        let limit = page
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);

        Ok(recipes.iter().skip(offset).take(limit).cloned().collect())
    }

    fn get(&self, id: Uuid) -> Result<RecipeRecord, StoreError> {
        self.recipes
            .read()
            .iter()
            .find(|record| record.recipe.id == id)
            .cloned()
            .ok_or(StoreError::RecipeNotFound)
    }

    fn create(&self, data: NewRecipeData) -> Result<RecipeRecord, StoreError> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let record = RecipeRecord {
            recipe: Recipe {
                id,
                name: data.name,
                description: data.description,
                created_at: now,
                updated_at: now,
            },
            ingredients: build_ingredients(id, data.ingredients),
        };

        self.recipes.write().push(record.clone());
        Ok(record)
    }

    fn update(&self, id: Uuid, changes: RecipeChanges) -> Result<RecipeRecord, StoreError> {
        let mut recipes = self.recipes.write();
        let record = recipes
            .iter_mut()
            .find(|record| record.recipe.id == id)
            .ok_or(StoreError::RecipeNotFound)?;

        if let Some(name) = changes.name {
            record.recipe.name = name;
        }
        if let Some(description) = changes.description {
            record.recipe.description = description;
        }
        if let Some(items) = changes.ingredients {
            record.ingredients = build_ingredients(id, items);
        }
        record.recipe.updated_at = Utc::now();

        Ok(record.clone())
    }

    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut recipes = self.recipes.write();
        let index = recipes
            .iter()
            .position(|record| record.recipe.id == id)
            .ok_or(StoreError::RecipeNotFound)?;

        recipes.remove(index);
        Ok(())
    }

    fn list_ingredients(&self, recipe_id: Uuid) -> Result<Vec<Ingredient>, StoreError> {
        self.get(recipe_id).map(|record| record.ingredients)
    }

    fn add_ingredient(
        &self,
        recipe_id: Uuid,
        data: NewIngredientData,
    ) -> Result<Ingredient, StoreError> {
        let mut recipes = self.recipes.write();
        let record = recipes
            .iter_mut()
            .find(|record| record.recipe.id == recipe_id)
            .ok_or(StoreError::RecipeNotFound)?;

        let next_position = record
            .ingredients
            .last()
            .map_or(0, |ingredient| ingredient.position + 1);
        let ingredient = new_ingredient(recipe_id, data, next_position);

        record.ingredients.push(ingredient.clone());
        record.recipe.updated_at = Utc::now();

        Ok(ingredient)
    }

    fn delete_ingredient(&self, recipe_id: Uuid, ingredient_id: Uuid) -> Result<(), StoreError> {
        let mut recipes = self.recipes.write();
        let record = recipes
            .iter_mut()
            .find(|record| record.recipe.id == recipe_id)
            .ok_or(StoreError::RecipeNotFound)?;

        let index = record
            .ingredients
            .iter()
            .position(|ingredient| ingredient.id == ingredient_id)
            .ok_or(StoreError::IngredientNotFound)?;

        record.ingredients.remove(index);
        record.recipe.updated_at = Utc::now();

        Ok(())
    }
}
