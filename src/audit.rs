use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Mutations recorded in `audit_logs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    RecipeCreate,
    RecipeUpdate,
    RecipeDelete,
    FavoriteAdd,
    FavoriteRemove,
    CartAdd,
    CartRemove,
    Subscribe,
    Unsubscribe,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::RecipeCreate => "recipe_create",
            AuditAction::RecipeUpdate => "recipe_update",
            AuditAction::RecipeDelete => "recipe_delete",
            AuditAction::FavoriteAdd => "favorite_add",
            AuditAction::FavoriteRemove => "favorite_remove",
            AuditAction::CartAdd => "cart_add",
            AuditAction::CartRemove => "cart_remove",
            AuditAction::Subscribe => "subscribe",
            AuditAction::Unsubscribe => "unsubscribe",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Record an audit entry; a failure is logged and never fails the caller.
pub async fn record(
    pool: &DbPool,
    user_id: Uuid,
    action: AuditAction,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(pool, Some(user_id), action, Some(resource), Some(metadata)).await
    {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
