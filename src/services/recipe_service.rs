use std::collections::HashSet;

use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::recipes::{RecipeWriteRequest, ValidatedRecipe},
    entity::{
        Ingredients, RecipeIngredients, RecipeTags, Recipes, Tags,
        ingredients::Column as IngredientCol,
        recipe_ingredients::{ActiveModel as LineActive, Column as LineCol},
        recipe_tags::{ActiveModel as RecipeTagActive, Column as RecipeTagCol},
        recipes::{ActiveModel as RecipeActive, Column as RecipeCol},
        tags::Column as TagCol,
    },
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::{AuthUser, Viewer, ensure_author},
    models::Recipe,
    response::{ApiResponse, Empty, Meta},
    services::recipe_query_service::fetch_recipe,
    state::AppState,
};

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<Recipe>> {
    let recipe = payload.validate()?;

    let txn = state.orm.begin().await?;

    ensure_references(&txn, &recipe).await?;
    ensure_name_available(&txn, user.user_id, &recipe.name, None).await?;

    let id = Uuid::new_v4();
    RecipeActive {
        id: Set(id),
        author_id: Set(user.user_id),
        name: Set(recipe.name.clone()),
        text: Set(recipe.text.clone()),
        cooking_time: Set(recipe.cooking_time),
        image: Set(recipe.image.clone()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(conflict_on_unique(duplicate_name(&recipe.name)))?;

    replace_composition(&txn, id, &recipe).await?;

    txn.commit().await?;

    tracing::info!(recipe_id = %id, author_id = %user.user_id, "recipe created");
    audit::record(
        &state.pool,
        user.user_id,
        AuditAction::RecipeCreate,
        "recipes",
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    let created = fetch_recipe(&state.orm, &Viewer::from(user), id).await?;
    Ok(ApiResponse::success(
        "Recipe created",
        created,
        Some(Meta::empty()),
    ))
}

/// Replaces scalar fields, the tag set and every ingredient line.
pub async fn update_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RecipeWriteRequest,
) -> AppResult<ApiResponse<Recipe>> {
    let txn = state.orm.begin().await?;

    let existing = Recipes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("recipe"))?;
    ensure_author(user, existing.author_id)?;

    let recipe = payload.validate()?;
    ensure_references(&txn, &recipe).await?;
    ensure_name_available(&txn, existing.author_id, &recipe.name, Some(id)).await?;

    let mut active: RecipeActive = existing.into();
    active.name = Set(recipe.name.clone());
    active.text = Set(recipe.text.clone());
    active.cooking_time = Set(recipe.cooking_time);
    active.image = Set(recipe.image.clone());
    active
        .update(&txn)
        .await
        .map_err(conflict_on_unique(duplicate_name(&recipe.name)))?;

    replace_composition(&txn, id, &recipe).await?;

    txn.commit().await?;

    tracing::info!(recipe_id = %id, author_id = %user.user_id, "recipe updated");
    audit::record(
        &state.pool,
        user.user_id,
        AuditAction::RecipeUpdate,
        "recipes",
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    let updated = fetch_recipe(&state.orm, &Viewer::from(user), id).await?;
    Ok(ApiResponse::success("Updated", updated, Some(Meta::empty())))
}

/// Ingredient lines, tags, favorites and cart rows go with the recipe
/// through `ON DELETE CASCADE`.
pub async fn delete_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Empty>> {
    let txn = state.orm.begin().await?;

    let existing = Recipes::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("recipe"))?;
    ensure_author(user, existing.author_id)?;

    Recipes::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(recipe_id = %id, author_id = %user.user_id, "recipe deleted");
    audit::record(
        &state.pool,
        user.user_id,
        AuditAction::RecipeDelete,
        "recipes",
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    Ok(ApiResponse::done("Deleted"))
}

/// Delete-all-then-reinsert of the tag set and the ingredient lines.
async fn replace_composition<C: ConnectionTrait>(
    db: &C,
    recipe_id: Uuid,
    recipe: &ValidatedRecipe,
) -> AppResult<()> {
    RecipeTags::delete_many()
        .filter(RecipeTagCol::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;
    RecipeIngredients::delete_many()
        .filter(LineCol::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;

    RecipeTags::insert_many(recipe.tag_ids.iter().map(|tag_id| RecipeTagActive {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
    }))
    .exec_without_returning(db)
    .await?;

    RecipeIngredients::insert_many(recipe.ingredients.iter().enumerate().map(
        |(position, line)| LineActive {
            id: Set(Uuid::new_v4()),
            recipe_id: Set(recipe_id),
            ingredient_id: Set(line.ingredient_id),
            amount: Set(line.amount),
            position: Set(position as i32),
        },
    ))
    .exec_without_returning(db)
    .await?;

    Ok(())
}

async fn ensure_references<C: ConnectionTrait>(db: &C, recipe: &ValidatedRecipe) -> AppResult<()> {
    let known_tags: HashSet<Uuid> = Tags::find()
        .select_only()
        .column(TagCol::Id)
        .filter(TagCol::Id.is_in(recipe.tag_ids.clone()))
        .into_tuple::<Uuid>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = recipe.tag_ids.iter().find(|id| !known_tags.contains(*id)) {
        return Err(AppError::BadRequest(format!("tag {missing} does not exist")));
    }

    let wanted: Vec<Uuid> = recipe.ingredients.iter().map(|l| l.ingredient_id).collect();
    let known_ingredients: HashSet<Uuid> = Ingredients::find()
        .select_only()
        .column(IngredientCol::Id)
        .filter(IngredientCol::Id.is_in(wanted.clone()))
        .into_tuple::<Uuid>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = wanted.iter().find(|id| !known_ingredients.contains(*id)) {
        return Err(AppError::BadRequest(format!(
            "ingredient {missing} does not exist"
        )));
    }

    Ok(())
}

async fn ensure_name_available<C: ConnectionTrait>(
    db: &C,
    author_id: Uuid,
    name: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Recipes::find()
        .filter(RecipeCol::AuthorId.eq(author_id))
        .filter(RecipeCol::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(RecipeCol::Id.ne(id));
    }

    if finder.count(db).await? > 0 {
        return Err(AppError::Conflict(duplicate_name(name)));
    }
    Ok(())
}

fn duplicate_name(name: &str) -> String {
    format!("you already have a recipe named `{name}`")
}
