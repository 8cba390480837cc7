use super::{NewIngredientData, NewRecipeData, Page, RecipeChanges, RecipeStore, StoreError};
use crate::db::DbPool;
use crate::models::{
    Ingredient, NewIngredient, NewRecipe, Recipe, RecipeChangeset, RecipeRecord,
};
use crate::schema::{ingredients, recipes};
use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;
use uuid::Uuid;

/// Diesel-backed store. Every mutating operation runs in its own transaction.
#[derive(Clone)]
pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn find_recipe(conn: &mut PgConnection, id: Uuid) -> Result<Recipe, StoreError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::RecipeNotFound)
}

fn load_ingredients(conn: &mut PgConnection, recipe: &Recipe) -> QueryResult<Vec<Ingredient>> {
    Ingredient::belonging_to(recipe)
        .select(Ingredient::as_select())
        .order(ingredients::position.asc())
        .load(conn)
}

/// Inserts `items` in order, numbering positions from `first_position`.
fn insert_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    items: &[NewIngredientData],
    first_position: i32,
) -> QueryResult<Vec<Ingredient>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<NewIngredient> = items
        .iter()
        .zip(first_position..)
        .map(|(item, position)| NewIngredient {
            recipe_id,
            name: &item.name,
            position,
        })
        .collect();

    let mut inserted: Vec<Ingredient> = diesel::insert_into(ingredients::table)
        .values(&rows)
        .returning(Ingredient::as_returning())
        .get_results(conn)?;
    inserted.sort_by_key(|ingredient| ingredient.position);

    Ok(inserted)
}

fn touch_recipe(conn: &mut PgConnection, id: Uuid) -> QueryResult<usize> {
    diesel::update(recipes::table.find(id))
        .set(recipes::updated_at.eq(Utc::now()))
        .execute(conn)
}

impl RecipeStore for PgRecipeStore {
    fn list(&self, page: Page) -> Result<Vec<RecipeRecord>, StoreError> {
        let mut conn = self.pool.get()?;

        let mut query = recipes::table
            .select(Recipe::as_select())
            .order((recipes::created_at.asc(), recipes::id.asc()))
            .into_boxed();
        if page.offset > 0 {
            query = query.offset(page.offset);
        }
        if let Some(limit) = page.limit {
            query = query.limit(limit);
        }

        let recipes: Vec<Recipe> = query.load(&mut conn)?;

        // One query for all ingredients of the page, then group by parent
        let ingredients: Vec<Ingredient> = Ingredient::belonging_to(&recipes)
            .select(Ingredient::as_select())
            .order(ingredients::position.asc())
            .load(&mut conn)?;

        Ok(ingredients
            .grouped_by(&recipes)
            .into_iter()
            .zip(recipes)
            .map(|(ingredients, recipe)| RecipeRecord {
                recipe,
                ingredients,
            })
            .collect())
    }

    fn get(&self, id: Uuid) -> Result<RecipeRecord, StoreError> {
        let mut conn = self.pool.get()?;

        let recipe = find_recipe(&mut conn, id)?;
        let ingredients = load_ingredients(&mut conn, &recipe)?;

        Ok(RecipeRecord {
            recipe,
            ingredients,
        })
    }

    fn create(&self, data: NewRecipeData) -> Result<RecipeRecord, StoreError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, StoreError, _>(|conn| {
            let recipe: Recipe = diesel::insert_into(recipes::table)
                .values(NewRecipe {
                    name: &data.name,
                    description: &data.description,
                })
                .returning(Recipe::as_returning())
                .get_result(conn)?;

            let ingredients = insert_ingredients(conn, recipe.id, &data.ingredients, 0)?;

            Ok(RecipeRecord {
                recipe,
                ingredients,
            })
        })
    }

    fn update(&self, id: Uuid, changes: RecipeChanges) -> Result<RecipeRecord, StoreError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, StoreError, _>(|conn| {
            let changeset = RecipeChangeset {
                name: changes.name.as_deref(),
                description: changes.description.as_deref(),
                updated_at: Utc::now(),
            };

            let recipe: Recipe = diesel::update(recipes::table.find(id))
                .set(&changeset)
                .returning(Recipe::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or(StoreError::RecipeNotFound)?;

            let ingredients = match &changes.ingredients {
                Some(items) => {
                    diesel::delete(ingredients::table.filter(ingredients::recipe_id.eq(id)))
                        .execute(conn)?;
                    insert_ingredients(conn, id, items, 0)?
                }
                None => load_ingredients(conn, &recipe)?,
            };

            Ok(RecipeRecord {
                recipe,
                ingredients,
            })
        })
    }

    fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;

        // Ingredients go with it via ON DELETE CASCADE
        let deleted = diesel::delete(recipes::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(StoreError::RecipeNotFound);
        }

        Ok(())
    }

    fn list_ingredients(&self, recipe_id: Uuid) -> Result<Vec<Ingredient>, StoreError> {
        let mut conn = self.pool.get()?;

        let recipe = find_recipe(&mut conn, recipe_id)?;
        Ok(load_ingredients(&mut conn, &recipe)?)
    }

    fn add_ingredient(
        &self,
        recipe_id: Uuid,
        data: NewIngredientData,
    ) -> Result<Ingredient, StoreError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, StoreError, _>(|conn| {
            // Lock the parent row so concurrent appends get distinct positions
            recipes::table
                .find(recipe_id)
                .select(recipes::id)
                .for_update()
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(StoreError::RecipeNotFound)?;

            let last_position: Option<i32> = ingredients::table
                .filter(ingredients::recipe_id.eq(recipe_id))
                .select(max(ingredients::position))
                .first(conn)?;

            let next_position = last_position.map_or(0, |position| position + 1);
            let mut inserted = insert_ingredients(
                conn,
                recipe_id,
                std::slice::from_ref(&data),
                next_position,
            )?;
            touch_recipe(conn, recipe_id)?;

            inserted.pop().ok_or(StoreError::Database(diesel::NotFound))
        })
    }

    fn delete_ingredient(&self, recipe_id: Uuid, ingredient_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, StoreError, _>(|conn| {
            find_recipe(conn, recipe_id)?;

            let deleted = diesel::delete(
                ingredients::table
                    .filter(ingredients::id.eq(ingredient_id))
                    .filter(ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(StoreError::IngredientNotFound);
            }

            touch_recipe(conn, recipe_id)?;
            Ok(())
        })
    }
}
