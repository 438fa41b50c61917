mod common;

use common::{create_ingredient, create_tag, setup_state, unique};
use foodgram_api::{
    error::AppError,
    routes::params::IngredientQuery,
    services::catalog_service::{self, escape_like},
};
use uuid::Uuid;

async fn search(state: &foodgram_api::state::AppState, name: &str) -> anyhow::Result<Vec<Uuid>> {
    let resp = catalog_service::list_ingredients(
        state,
        IngredientQuery {
            name: Some(name.to_string()),
        },
    )
    .await?;
    Ok(resp
        .data
        .expect("ingredients")
        .items
        .into_iter()
        .map(|i| i.id)
        .collect())
}

#[tokio::test]
async fn ingredient_search_is_a_case_insensitive_prefix_match() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let prefix = unique("spice");
    let pepper = create_ingredient(&state, &format!("{prefix} black pepper"), "g").await?;
    let paprika = create_ingredient(&state, &format!("{prefix}_paprika"), "g").await?;
    let cumin = create_ingredient(&state, &format!("{prefix}xcumin"), "g").await?;

    let found = search(&state, &prefix.to_uppercase()).await?;
    for id in [pepper, paprika, cumin] {
        assert!(found.contains(&id));
    }

    // A fragment from the middle of a name is not a prefix.
    let found = search(&state, "black pepper").await?;
    assert!(!found.contains(&pepper));

    // `_` and `%` in the input match only themselves.
    let found = search(&state, &format!("{prefix}_")).await?;
    assert!(found.contains(&paprika));
    assert!(!found.contains(&cumin));
    assert!(!found.contains(&pepper));

    let found = search(&state, &format!("{prefix}%")).await?;
    assert!(found.is_empty());
    Ok(())
}

#[tokio::test]
async fn catalog_lookups_by_id() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let (tag_id, slug) = create_tag(&state, "lookup").await?;
    let tag = catalog_service::get_tag(&state, tag_id)
        .await?
        .data
        .expect("tag");
    assert_eq!(tag.slug, slug);

    let missing = catalog_service::get_ingredient(&state, Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[test]
fn like_wildcards_are_escaped() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    assert_eq!(escape_like("plain"), "plain");
}
