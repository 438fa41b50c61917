use std::collections::HashMap;

use anyhow::anyhow;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::recipes::RecipeList,
    entity::{
        Favorites, Ingredients, RecipeIngredients, RecipeTags, Recipes, ShoppingCarts, Tags, Users,
        favorites::Column as FavCol,
        recipe_ingredients::Column as LineCol,
        recipe_tags::Column as RecipeTagCol,
        recipes::{Column as RecipeCol, Model as RecipeModel},
        shopping_carts::Column as CartCol,
        tags::Column as TagCol,
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    middleware::auth::Viewer,
    models::{Recipe, RecipeIngredient, Tag, User},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::membership::Membership,
    state::AppState,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilters {
    /// Tag slugs, any of which must be attached.
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    /// Only honoured for an authenticated viewer.
    pub is_favorited: bool,
    /// Only honoured for an authenticated viewer.
    pub is_in_shopping_cart: bool,
}

pub fn filter_condition(viewer: &Viewer, filters: &RecipeFilters) -> Condition {
    let mut condition = Condition::all();

    if !filters.tags.is_empty() {
        let tagged = Query::select()
            .column((RecipeTags, RecipeTagCol::RecipeId))
            .from(RecipeTags)
            .inner_join(
                Tags,
                Expr::col((Tags, TagCol::Id)).equals((RecipeTags, RecipeTagCol::TagId)),
            )
            .and_where(Expr::col((Tags, TagCol::Slug)).is_in(filters.tags.clone()))
            .to_owned();
        condition = condition.add(RecipeCol::Id.in_subquery(tagged));
    }

    if let Some(author) = filters.author {
        condition = condition.add(RecipeCol::AuthorId.eq(author));
    }

    if let Some(user_id) = viewer.user_id() {
        if filters.is_favorited {
            let favorited = Query::select()
                .column(FavCol::RecipeId)
                .from(Favorites)
                .and_where(FavCol::UserId.eq(user_id))
                .to_owned();
            condition = condition.add(RecipeCol::Id.in_subquery(favorited));
        }
        if filters.is_in_shopping_cart {
            let in_cart = Query::select()
                .column(CartCol::RecipeId)
                .from(ShoppingCarts)
                .and_where(CartCol::UserId.eq(user_id))
                .to_owned();
            condition = condition.add(RecipeCol::Id.in_subquery(in_cart));
        }
    }

    condition
}

pub async fn list_recipes(
    state: &AppState,
    viewer: &Viewer,
    filters: RecipeFilters,
    pagination: Pagination,
) -> AppResult<ApiResponse<RecipeList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Recipes::find()
        .filter(filter_condition(viewer, &filters))
        .order_by_desc(RecipeCol::CreatedAt)
        .order_by_asc(RecipeCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset)
        .all(&state.orm)
        .await?;

    let items = expand_recipes(&state.orm, viewer, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

pub async fn get_recipe(
    state: &AppState,
    viewer: &Viewer,
    id: Uuid,
) -> AppResult<ApiResponse<Recipe>> {
    let recipe = fetch_recipe(&state.orm, viewer, id).await?;
    Ok(ApiResponse::success("Recipe", recipe, None))
}

pub(crate) async fn fetch_recipe<C: ConnectionTrait>(
    db: &C,
    viewer: &Viewer,
    id: Uuid,
) -> AppResult<Recipe> {
    let row = Recipes::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("recipe"))?;

    expand_recipes(db, viewer, vec![row])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("recipe"))
}

/// Attach tags, ingredient lines, authors and viewer flags to a page of
/// recipes. Issues a fixed number of queries regardless of page size.
pub(crate) async fn expand_recipes<C: ConnectionTrait>(
    db: &C,
    viewer: &Viewer,
    recipes: Vec<RecipeModel>,
) -> AppResult<Vec<Recipe>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    let tag_rows = RecipeTags::find()
        .filter(RecipeTagCol::RecipeId.is_in(ids.clone()))
        .find_also_related(Tags)
        .order_by_asc(TagCol::Name)
        .all(db)
        .await?;
    for (link, tag) in tag_rows {
        if let Some(tag) = tag {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag.into());
        }
    }

    let mut lines_by_recipe: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    let line_rows = RecipeIngredients::find()
        .filter(LineCol::RecipeId.is_in(ids.clone()))
        .order_by_asc(LineCol::Position)
        .find_also_related(Ingredients)
        .all(db)
        .await?;
    for (line, ingredient) in line_rows {
        if let Some(ingredient) = ingredient {
            lines_by_recipe
                .entry(line.recipe_id)
                .or_default()
                .push(RecipeIngredient {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: line.amount,
                });
        }
    }

    let authors: HashMap<Uuid, _> = Users::find()
        .filter(UserCol::Id.is_in(author_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let membership = Membership::load(db, viewer, &ids, &author_ids).await?;

    recipes
        .into_iter()
        .map(|row| {
            let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                AppError::Internal(anyhow!("author {} of recipe {} missing", row.author_id, row.id))
            })?;
            Ok(Recipe {
                id: row.id,
                tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                author: User::from_entity(author, membership.is_subscribed(row.author_id)),
                ingredients: lines_by_recipe.remove(&row.id).unwrap_or_default(),
                is_favorited: membership.is_favorited(row.id),
                is_in_shopping_cart: membership.is_in_shopping_cart(row.id),
                name: row.name,
                image: row.image,
                text: row.text,
                cooking_time: row.cooking_time,
                created_at: row.created_at.with_timezone(&Utc),
            })
        })
        .collect()
}
