//! Translation between stored recipes and their JSON representation.
//!
//! Incoming bodies are checked field by field against the model constraints
//! and every problem is reported at once, keyed by field path
//! (`name`, `ingredients.0.name`, ...). Text is stored trimmed.

use crate::models::{Ingredient, RecipeRecord};
use crate::store::{NewIngredientData, NewRecipeData, RecipeChanges};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Column width of `recipes.name` and `ingredients.name`.
pub const NAME_MAX_LENGTH: usize = 255;

/// Key used for errors that don't belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_STRING: &str = "Not a valid string.";

/// Field-keyed validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid fields: {}", .fields.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`, empty when the field was valid.
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Request body for creating or updating a recipe.
#[derive(Debug, Clone, ToSchema)]
pub struct RecipeRequest {
    /// Required on create and full update
    pub name: String,
    /// Required on create and full update
    pub description: String,
    /// When present on update, replaces the recipe's ingredient list
    pub ingredients: Option<Vec<IngredientRequest>>,
}

#[derive(Debug, Clone, ToSchema)]
pub struct IngredientRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<IngredientResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
    errors: &mut ValidationError,
) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(object) => Some(object),
        other => {
            errors.add(
                path,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    type_name(other)
                ),
            );
            None
        }
    }
}

/// Reads a text field, accepting strings and numbers. Returns `None` when the
/// field is absent or invalid; invalid values and missing required fields are
/// recorded in `errors`.
fn text_field(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    required: bool,
    max_length: Option<usize>,
    errors: &mut ValidationError,
) -> Option<String> {
    let raw = match object.get(key) {
        None => {
            if required {
                errors.add(path, REQUIRED);
            }
            return None;
        }
        Some(Value::Null) => {
            errors.add(path, NOT_NULL);
            return None;
        }
        Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
        // Numbers are taken as their JSON text: 42 -> "42"
        Some(Value::Number(number)) => Cow::Owned(number.to_string()),
        Some(_) => {
            errors.add(path, NOT_STRING);
            return None;
        }
    };
    let text = raw.trim();

    if text.is_empty() {
        errors.add(path, NOT_BLANK);
        return None;
    }

    if let Some(max_length) = max_length {
        if text.chars().count() > max_length {
            errors.add(
                path,
                format!("Ensure this field has no more than {max_length} characters."),
            );
            return None;
        }
    }

    Some(text.to_string())
}

fn ingredient_item(
    value: &Value,
    object_path: &str,
    name_path: &str,
    errors: &mut ValidationError,
) -> Option<NewIngredientData> {
    let object = expect_object(value, object_path, errors)?;
    let name = text_field(
        object,
        "name",
        name_path,
        true,
        Some(NAME_MAX_LENGTH),
        errors,
    )?;

    Some(NewIngredientData { name })
}

fn ingredients_field(
    object: &Map<String, Value>,
    errors: &mut ValidationError,
) -> Option<Vec<NewIngredientData>> {
    match object.get("ingredients")? {
        Value::Array(items) => Some(
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let path = format!("ingredients.{index}");
                    ingredient_item(item, &path, &format!("{path}.name"), errors)
                })
                .collect(),
        ),
        Value::Null => {
            errors.add("ingredients", NOT_NULL);
            None
        }
        other => {
            errors.add(
                "ingredients",
                format!(
                    "Expected a list of items but got type \"{}\".",
                    type_name(other)
                ),
            );
            None
        }
    }
}

/// Reads all writable recipe fields. `required` makes `name` and
/// `description` mandatory.
fn recipe_fields(data: &Value, required: bool) -> Result<RecipeChanges, ValidationError> {
    let mut errors = ValidationError::default();
    let Some(object) = expect_object(data, NON_FIELD_ERRORS, &mut errors) else {
        return Err(errors);
    };

    let changes = RecipeChanges {
        name: text_field(
            object,
            "name",
            "name",
            required,
            Some(NAME_MAX_LENGTH),
            &mut errors,
        ),
        description: text_field(object, "description", "description", required, None, &mut errors),
        ingredients: ingredients_field(object, &mut errors),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

/// Validates a create payload: `name` and `description` are required,
/// `ingredients` defaults to an empty list.
pub fn validate_create(data: &Value) -> Result<NewRecipeData, ValidationError> {
    let fields = recipe_fields(data, true)?;

    match (fields.name, fields.description) {
        (Some(name), Some(description)) => Ok(NewRecipeData {
            name,
            description,
            ingredients: fields.ingredients.unwrap_or_default(),
        }),
        // Unreachable in practice: recipe_fields records missing required fields
        (name, description) => {
            let mut errors = ValidationError::default();
            for (field, value) in [("name", name), ("description", description)] {
                if value.is_none() {
                    errors.add(field, REQUIRED);
                }
            }
            Err(errors)
        }
    }
}

/// Validates an update payload.
///
/// With `partial` only the fields present are checked and changed. Without it
/// the payload must carry every required field, as on create.
pub fn validate_update(data: &Value, partial: bool) -> Result<RecipeChanges, ValidationError> {
    recipe_fields(data, !partial)
}

/// Validates the body of a single-ingredient create.
pub fn validate_ingredient(data: &Value) -> Result<NewIngredientData, ValidationError> {
    let mut errors = ValidationError::default();
    match ingredient_item(data, NON_FIELD_ERRORS, "name", &mut errors) {
        Some(ingredient) if errors.is_empty() => Ok(ingredient),
        _ => Err(errors),
    }
}

pub fn render_ingredient(ingredient: &Ingredient) -> IngredientResponse {
    IngredientResponse {
        id: ingredient.id,
        name: ingredient.name.clone(),
    }
}

pub fn render(record: &RecipeRecord) -> RecipeResponse {
    RecipeResponse {
        id: record.recipe.id,
        name: record.recipe.name.clone(),
        description: record.recipe.description.clone(),
        ingredients: record.ingredients.iter().map(render_ingredient).collect(),
        created_at: record.recipe.created_at,
        updated_at: record.recipe.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;
    use serde_json::json;

    #[test]
    fn test_create_accepts_minimal_payload() {
        let data = validate_create(&json!({
            "name": "Vegan Spaghetti Carbonara",
            "description": "Spaghetti with vegan bacon, miso and nutritional yeast"
        }))
        .unwrap();

        assert_eq!(data.name, "Vegan Spaghetti Carbonara");
        assert!(data.ingredients.is_empty());
    }

    #[test]
    fn test_create_reads_ingredients_in_order() {
        let data = validate_create(&json!({
            "name": "Pesto",
            "description": "Basil sauce",
            "ingredients": [{"name": "basil"}, {"name": " pine nuts "}]
        }))
        .unwrap();

        let names: Vec<&str> = data.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["basil", "pine nuts"]);
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let err = validate_create(&json!({})).unwrap_err();

        assert_eq!(err.messages("name"), [REQUIRED]);
        assert_eq!(err.messages("description"), [REQUIRED]);
    }

    #[test]
    fn test_create_rejects_wrong_types() {
        let err = validate_create(&json!({
            "name": true,
            "description": null,
            "ingredients": "flour"
        }))
        .unwrap_err();

        assert_eq!(err.messages("name"), [NOT_STRING]);
        assert_eq!(err.messages("description"), [NOT_NULL]);
        assert_eq!(
            err.messages("ingredients"),
            ["Expected a list of items but got type \"str\"."]
        );
    }

    #[test]
    fn test_numbers_are_read_as_text() {
        let data = validate_create(&json!({
            "name": 42,
            "description": 1.5,
            "ingredients": [{"name": 7}]
        }))
        .unwrap();

        assert_eq!(data.name, "42");
        assert_eq!(data.description, "1.5");
        assert_eq!(data.ingredients[0].name, "7");
    }

    #[test]
    fn test_lists_and_objects_are_not_text() {
        let err = validate_create(&json!({
            "name": ["Carbonara"],
            "description": {"text": "Pasta"}
        }))
        .unwrap_err();

        assert_eq!(err.messages("name"), [NOT_STRING]);
        assert_eq!(err.messages("description"), [NOT_STRING]);
    }

    #[test]
    fn test_create_rejects_blank_and_overlong() {
        let err = validate_create(&json!({
            "name": "x".repeat(NAME_MAX_LENGTH + 1),
            "description": "   "
        }))
        .unwrap_err();

        assert_eq!(
            err.messages("name"),
            ["Ensure this field has no more than 255 characters."]
        );
        assert_eq!(err.messages("description"), [NOT_BLANK]);
    }

    #[test]
    fn test_nested_ingredient_errors_are_indexed() {
        let err = validate_create(&json!({
            "name": "Soup",
            "description": "Hot",
            "ingredients": [{"name": "leek"}, {}, "salt"]
        }))
        .unwrap_err();

        assert!(err.messages("ingredients.0.name").is_empty());
        assert_eq!(err.messages("ingredients.1.name"), [REQUIRED]);
        assert_eq!(
            err.messages("ingredients.2"),
            ["Invalid data. Expected a dictionary, but got str."]
        );
    }

    #[test]
    fn test_body_must_be_object() {
        let err = validate_create(&json!(["name"])).unwrap_err();
        assert_eq!(
            err.messages(NON_FIELD_ERRORS),
            ["Invalid data. Expected a dictionary, but got list."]
        );
    }

    #[test]
    fn test_partial_update_only_sets_present_fields() {
        let changes = validate_update(&json!({"name": "Renamed", "id": "ignored"}), true).unwrap();

        assert_eq!(changes.name.as_deref(), Some("Renamed"));
        assert_eq!(changes.description, None);
        assert_eq!(changes.ingredients, None);
    }

    #[test]
    fn test_partial_update_still_validates_present_fields() {
        let err = validate_update(&json!({"description": ""}), true).unwrap_err();
        assert_eq!(err.messages("description"), [NOT_BLANK]);
    }

    #[test]
    fn test_full_update_requires_all_fields() {
        let err = validate_update(&json!({"name": "Only a name"}), false).unwrap_err();

        assert!(err.messages("name").is_empty());
        assert_eq!(err.messages("description"), [REQUIRED]);
    }

    #[test]
    fn test_validate_ingredient() {
        let ingredient = validate_ingredient(&json!({"name": "nutritional yeast"})).unwrap();
        assert_eq!(ingredient.name, "nutritional yeast");

        let err = validate_ingredient(&json!({"name": ""})).unwrap_err();
        assert_eq!(err.messages("name"), [NOT_BLANK]);
    }

    #[test]
    fn test_render_includes_nested_ingredients() {
        let recipe_id = Uuid::new_v4();
        let now = Utc::now();
        let record = RecipeRecord {
            recipe: Recipe {
                id: recipe_id,
                name: "Carbonara".to_string(),
                description: "Pasta".to_string(),
                created_at: now,
                updated_at: now,
            },
            ingredients: vec![Ingredient {
                id: Uuid::new_v4(),
                recipe_id,
                name: "spaghetti".to_string(),
                position: 0,
                created_at: now,
            }],
        };

        let rendered = serde_json::to_value(render(&record)).unwrap();

        assert_eq!(rendered["id"], json!(recipe_id));
        assert_eq!(rendered["name"], "Carbonara");
        assert_eq!(rendered["description"], "Pasta");
        assert_eq!(rendered["ingredients"][0]["name"], "spaghetti");
        assert!(rendered["ingredients"][0].get("position").is_none());
    }
}
