#![allow(dead_code)]

use foodgram_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::RegisterRequest,
        recipes::{IngredientAmountInput, RecipeWriteRequest},
    },
    middleware::auth::AuthUser,
    services::auth_service,
    state::AppState,
};
use uuid::Uuid;

/// `None` when no database is configured, so the caller can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
            return Ok(None);
        }
    };

    let config = AppConfig::with_database_url(database_url);
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;
    Ok(Some(AppState::new(pool, config)))
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..12])
}

pub async fn create_user(state: &AppState, prefix: &str) -> anyhow::Result<AuthUser> {
    let username = unique(prefix);
    let resp = auth_service::register_user(
        state,
        RegisterRequest {
            email: format!("{username}@example.com"),
            username: username.clone(),
            first_name: "Test".into(),
            last_name: prefix.into(),
            password: "secret-password".into(),
        },
    )
    .await?;
    let user = resp.data.expect("registered user");
    Ok(AuthUser { user_id: user.id })
}

pub async fn create_tag(state: &AppState, prefix: &str) -> anyhow::Result<(Uuid, String)> {
    let slug = unique(prefix);
    let color = format!("#{}", &Uuid::new_v4().simple().to_string()[..6]);
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&slug)
    .bind(color)
    .bind(&slug)
    .fetch_one(&state.pool)
    .await?;
    Ok((id, slug))
}

pub async fn create_ingredient(state: &AppState, name: &str, unit: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(unit)
    .fetch_one(&state.pool)
    .await?;
    Ok(id)
}

pub fn recipe_request(
    name: &str,
    tags: Vec<Uuid>,
    ingredients: Vec<(Uuid, i32)>,
) -> RecipeWriteRequest {
    RecipeWriteRequest {
        tags: Some(tags),
        ingredients: Some(
            ingredients
                .into_iter()
                .map(|(id, amount)| IngredientAmountInput::new(id, amount))
                .collect(),
        ),
        name: Some(name.to_string()),
        text: Some("Mix everything and cook.".into()),
        cooking_time: Some(20),
        image: None,
    }
}
