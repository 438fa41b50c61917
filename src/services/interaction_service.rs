use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::AuthUser,
    models::ShortRecipe,
    response::{ApiResponse, Empty, Meta},
    state::AppState,
};

/// The two (user, recipe) membership tables. They share one shape and differ
/// only in meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Favorite,
    ShoppingCart,
}

impl InteractionKind {
    fn table(self) -> &'static str {
        match self {
            InteractionKind::Favorite => "favorites",
            InteractionKind::ShoppingCart => "shopping_carts",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InteractionKind::Favorite => "favorites",
            InteractionKind::ShoppingCart => "shopping cart",
        }
    }

    fn audit_action(self, added: bool) -> AuditAction {
        match (self, added) {
            (InteractionKind::Favorite, true) => AuditAction::FavoriteAdd,
            (InteractionKind::Favorite, false) => AuditAction::FavoriteRemove,
            (InteractionKind::ShoppingCart, true) => AuditAction::CartAdd,
            (InteractionKind::ShoppingCart, false) => AuditAction::CartRemove,
        }
    }

    fn already_present(self) -> String {
        format!("recipe is already in {}", self.label())
    }
}

pub async fn add_interaction(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
    kind: InteractionKind,
) -> AppResult<ApiResponse<ShortRecipe>> {
    let recipe: Option<ShortRecipe> =
        sqlx::query_as("SELECT id, name, image, cooking_time FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&state.pool)
            .await?;
    let recipe = recipe.ok_or_else(|| AppError::not_found("recipe"))?;

    let select = format!(
        "SELECT id FROM {} WHERE user_id = $1 AND recipe_id = $2",
        kind.table()
    );
    let existing: Option<(Uuid,)> = sqlx::query_as(&select)
        .bind(user.user_id)
        .bind(recipe_id)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(kind.already_present()));
    }

    // A concurrent insert of the same pair still lands on the unique constraint.
    let insert = format!(
        "INSERT INTO {} (id, user_id, recipe_id) VALUES ($1, $2, $3)",
        kind.table()
    );
    sqlx::query(&insert)
        .bind(Uuid::new_v4())
        .bind(user.user_id)
        .bind(recipe_id)
        .execute(&state.pool)
        .await
        .map_err(conflict_on_unique(kind.already_present()))?;

    tracing::info!(user_id = %user.user_id, recipe_id = %recipe_id, kind = kind.label(), "recipe added");
    audit::record(
        &state.pool,
        user.user_id,
        kind.audit_action(true),
        kind.table(),
        serde_json::json!({ "recipe_id": recipe_id }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Added to {}", kind.label()),
        recipe,
        Some(Meta::empty()),
    ))
}

pub async fn remove_interaction(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
    kind: InteractionKind,
) -> AppResult<ApiResponse<Empty>> {
    let delete = format!(
        "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
        kind.table()
    );
    let result = sqlx::query(&delete)
        .bind(user.user_id)
        .bind(recipe_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "recipe {recipe_id} in {}",
            kind.label()
        )));
    }

    tracing::info!(user_id = %user.user_id, recipe_id = %recipe_id, kind = kind.label(), "recipe removed");
    audit::record(
        &state.pool,
        user.user_id,
        kind.audit_action(false),
        kind.table(),
        serde_json::json!({ "recipe_id": recipe_id }),
    )
    .await;

    Ok(ApiResponse::done(format!("Removed from {}", kind.label())))
}
