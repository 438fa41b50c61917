use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::users::UserList,
    entity::{Users, users::Column as UserCol},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Viewer},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::membership::subscribed_authors,
    state::AppState,
};

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;
    Ok(ApiResponse::success("OK", User::from_entity(model, false), None))
}

pub async fn get_user(state: &AppState, viewer: &Viewer, id: Uuid) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("user"))?;
    let subscribed = subscribed_authors(&state.orm, viewer, &[model.id]).await?;
    let is_subscribed = subscribed.contains(&model.id);
    Ok(ApiResponse::success(
        "OK",
        User::from_entity(model, is_subscribed),
        None,
    ))
}

pub async fn list_users(
    state: &AppState,
    viewer: &Viewer,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find()
        .order_by_asc(UserCol::CreatedAt)
        .order_by_asc(UserCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let rows = finder
        .limit(limit as u64)
        .offset(offset)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|u| u.id).collect();
    let subscribed = subscribed_authors(&state.orm, viewer, &ids).await?;
    let items = rows
        .into_iter()
        .map(|u| {
            let is_subscribed = subscribed.contains(&u.id);
            User::from_entity(u, is_subscribed)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}
