use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Recipe,
};

pub const MAX_NAME_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmountInput {
    pub id: Option<Uuid>,
    pub amount: Option<i32>,
}

impl IngredientAmountInput {
    pub fn new(id: Uuid, amount: i32) -> Self {
        Self {
            id: Some(id),
            amount: Some(amount),
        }
    }
}

/// Body of recipe create and update. Every field is optional on the wire so
/// that a missing one is reported by name instead of as a decoding failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct RecipeWriteRequest {
    pub tags: Option<Vec<Uuid>>,
    pub ingredients: Option<Vec<IngredientAmountInput>>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    /// Image URL; storage of the file itself happens elsewhere. Blank means no image.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: Uuid,
    pub amount: i32,
}

/// A recipe payload that passed [`RecipeWriteRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    /// Distinct, in submission order.
    pub tag_ids: Vec<Uuid>,
    /// Distinct ingredients, in submission order.
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeWriteRequest {
    pub fn validate(self) -> AppResult<ValidatedRecipe> {
        let RecipeWriteRequest {
            tags,
            ingredients,
            name,
            text,
            cooking_time,
            image,
        } = self;

        let tags = required(tags.filter(|t| !t.is_empty()), "tags")?;
        let ingredients = required(ingredients.filter(|i| !i.is_empty()), "ingredients")?;
        let name = required(present(name), "name")?;
        let text = required(present(text), "text")?;
        let cooking_time = required(cooking_time, "cooking_time")?;

        if name.trim() != name {
            return Err(AppError::BadRequest(
                "`name` must not start or end with whitespace".into(),
            ));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::BadRequest(format!(
                "`name` must be at most {MAX_NAME_LENGTH} characters"
            )));
        }
        if cooking_time < 1 {
            return Err(AppError::BadRequest(
                "`cooking_time` must be at least 1".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(ingredients.len());
        let mut lines = Vec::with_capacity(ingredients.len());
        for entry in ingredients {
            let (Some(ingredient_id), Some(amount)) = (entry.id, entry.amount) else {
                return Err(AppError::BadRequest(
                    "each ingredient needs `id` and `amount`".into(),
                ));
            };
            if amount < 1 {
                return Err(AppError::BadRequest(format!(
                    "amount of ingredient {ingredient_id} must be at least 1"
                )));
            }
            if !seen.insert(ingredient_id) {
                return Err(AppError::BadRequest(format!(
                    "ingredient {ingredient_id} is listed more than once"
                )));
            }
            lines.push(IngredientAmount {
                ingredient_id,
                amount,
            });
        }

        let mut seen_tags = HashSet::with_capacity(tags.len());
        let tag_ids = tags.into_iter().filter(|id| seen_tags.insert(*id)).collect();

        Ok(ValidatedRecipe {
            name,
            text,
            cooking_time,
            image: present(image),
            tag_ids,
            ingredients: lines,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("field `{field}` is required")))
}

/// Keeps the value as sent unless it is blank.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RecipeList {
    #[schema(value_type = Vec<Recipe>)]
    pub items: Vec<Recipe>,
}
