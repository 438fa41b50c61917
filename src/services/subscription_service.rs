use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::users::SubscriptionList,
    entity::{
        Recipes, Subscriptions, Users,
        recipes::{Column as RecipeCol, Model as RecipeModel},
        subscriptions::{ActiveModel as SubscriptionActive, Column as SubCol},
        users::{Column as UserCol, Model as UserModel},
    },
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::{AuthUser, Viewer},
    models::{AuthorWithRecipes, ShortRecipe, User},
    response::{ApiResponse, Empty, Meta},
    routes::params::{RecipesLimitQuery, SubscriptionQuery},
    services::membership::subscribed_authors,
    state::AppState,
};

pub async fn subscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: Uuid,
    limit: RecipesLimitQuery,
) -> AppResult<ApiResponse<AuthorWithRecipes>> {
    if author_id == user.user_id {
        return Err(AppError::BadRequest(
            "you cannot subscribe to yourself".into(),
        ));
    }
    let recipes_limit = limit.limit()?;

    let author = Users::find_by_id(author_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;

    let existing = Subscriptions::find()
        .filter(SubCol::UserId.eq(user.user_id))
        .filter(SubCol::AuthorId.eq(author_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(already_subscribed(&author.username)));
    }

    SubscriptionActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        author_id: Set(author_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(conflict_on_unique(already_subscribed(&author.username)))?;

    tracing::info!(user_id = %user.user_id, author_id = %author_id, "subscribed");
    audit::record(
        &state.pool,
        user.user_id,
        AuditAction::Subscribe,
        "subscriptions",
        serde_json::json!({ "author_id": author_id }),
    )
    .await;

    let summary = author_summaries(&state.orm, &Viewer::from(user), vec![author], recipes_limit)
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("user"))?;

    Ok(ApiResponse::success(
        "Subscribed",
        summary,
        Some(Meta::empty()),
    ))
}

pub async fn unsubscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: Uuid,
) -> AppResult<ApiResponse<Empty>> {
    let result = Subscriptions::delete_many()
        .filter(SubCol::UserId.eq(user.user_id))
        .filter(SubCol::AuthorId.eq(author_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("subscription"));
    }

    tracing::info!(user_id = %user.user_id, author_id = %author_id, "unsubscribed");
    audit::record(
        &state.pool,
        user.user_id,
        AuditAction::Unsubscribe,
        "subscriptions",
        serde_json::json!({ "author_id": author_id }),
    )
    .await;

    Ok(ApiResponse::done("Unsubscribed"))
}

/// Authors the user follows, newest subscription first.
pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    query: SubscriptionQuery,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let recipes_limit = query.recipes_limit().limit()?;
    let (page, limit, offset) = query.pagination().normalize();

    let finder = Subscriptions::find()
        .filter(SubCol::UserId.eq(user.user_id))
        .order_by_desc(SubCol::CreatedAt)
        .order_by_asc(SubCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let author_ids: Vec<Uuid> = finder
        .select_only()
        .column(SubCol::AuthorId)
        .limit(limit as u64)
        .offset(offset)
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?;

    let mut by_id: HashMap<Uuid, UserModel> = Users::find()
        .filter(UserCol::Id.is_in(author_ids.clone()))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let authors: Vec<UserModel> = author_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect();

    let items =
        author_summaries(&state.orm, &Viewer::from(user), authors, recipes_limit).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Subscriptions",
        SubscriptionList { items },
        Some(meta),
    ))
}

/// Profile, recipe count and the newest `recipes_limit` recipes of each
/// author. All authors' recipes come from one query.
async fn author_summaries<C: ConnectionTrait>(
    db: &C,
    viewer: &Viewer,
    authors: Vec<UserModel>,
    recipes_limit: Option<u64>,
) -> AppResult<Vec<AuthorWithRecipes>> {
    if authors.is_empty() {
        return Ok(Vec::new());
    }
    let author_ids: Vec<Uuid> = authors.iter().map(|a| a.id).collect();

    let mut by_author: HashMap<Uuid, Vec<RecipeModel>> = HashMap::new();
    let recipes = Recipes::find()
        .filter(RecipeCol::AuthorId.is_in(author_ids.clone()))
        .order_by_desc(RecipeCol::CreatedAt)
        .order_by_asc(RecipeCol::Name)
        .all(db)
        .await?;
    for recipe in recipes {
        by_author.entry(recipe.author_id).or_default().push(recipe);
    }

    let subscribed = subscribed_authors(db, viewer, &author_ids).await?;
    let cap = recipes_limit.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

    Ok(authors
        .into_iter()
        .map(|author| {
            let own = by_author.remove(&author.id).unwrap_or_default();
            let recipes_count = own.len() as i64;
            let recipes = own.into_iter().take(cap).map(short_recipe).collect();
            let is_subscribed = subscribed.contains(&author.id);
            AuthorWithRecipes {
                author: User::from_entity(author, is_subscribed),
                recipes,
                recipes_count,
            }
        })
        .collect())
}

fn short_recipe(model: RecipeModel) -> ShortRecipe {
    ShortRecipe {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}

fn already_subscribed(username: &str) -> String {
    format!("already subscribed to {username}")
}
