use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::catalog::{IngredientList, TagList},
    entity::{Ingredients, Tags, ingredients::Column as IngredientCol, tags::Column as TagCol},
    error::{AppError, AppResult},
    models::{Ingredient, Tag},
    response::ApiResponse,
    routes::params::IngredientQuery,
    state::AppState,
};

pub async fn list_tags(state: &AppState) -> AppResult<ApiResponse<TagList>> {
    let items = Tags::find()
        .order_by_asc(TagCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Tag::from)
        .collect();
    Ok(ApiResponse::success("Tags", TagList { items }, None))
}

pub async fn get_tag(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Tag>> {
    let tag = Tags::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("tag"))?;
    Ok(ApiResponse::success("Tag", Tag::from(tag), None))
}

/// Case-insensitive prefix search on the ingredient name.
pub async fn list_ingredients(
    state: &AppState,
    query: IngredientQuery,
) -> AppResult<ApiResponse<IngredientList>> {
    let mut finder = Ingredients::find();
    if let Some(name) = query.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("{}%", escape_like(name));
        finder = finder.filter(Expr::col(IngredientCol::Name).ilike(pattern));
    }

    let items = finder
        .order_by_asc(IngredientCol::Name)
        .order_by_asc(IngredientCol::MeasurementUnit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Ingredient::from)
        .collect();
    Ok(ApiResponse::success("Ingredients", IngredientList { items }, None))
}

pub async fn get_ingredient(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Ingredient>> {
    let ingredient = Ingredients::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("ingredient"))?;
    Ok(ApiResponse::success(
        "Ingredient",
        Ingredient::from(ingredient),
        None,
    ))
}

/// Escapes LIKE wildcards so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
