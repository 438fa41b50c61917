mod common;

use common::{create_ingredient, create_tag, create_user, recipe_request, setup_state, unique};
use foodgram_api::{
    error::AppError,
    middleware::auth::Viewer,
    services::{
        interaction_service::{self, InteractionKind},
        recipe_query_service, recipe_service, shopping_list_service,
    },
};
use std::{
    io,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

#[tokio::test]
async fn favorites_and_cart_reject_duplicates_and_missing() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let author = create_user(&state, "author").await?;
    let fan = create_user(&state, "fan").await?;
    let (tag_id, _) = create_tag(&state, "sweet").await?;
    let honey = create_ingredient(&state, &unique("honey"), "g").await?;
    let recipe = recipe_service::create_recipe(
        &state,
        &author,
        recipe_request("Honey toast", vec![tag_id], vec![(honey, 30)]),
    )
    .await?
    .data
    .expect("recipe");

    for kind in [InteractionKind::Favorite, InteractionKind::ShoppingCart] {
        let short = interaction_service::add_interaction(&state, &fan, recipe.id, kind)
            .await?
            .data
            .expect("short recipe");
        assert_eq!(short.id, recipe.id);
        assert_eq!(short.name, "Honey toast");

        let twice = interaction_service::add_interaction(&state, &fan, recipe.id, kind).await;
        assert!(matches!(twice, Err(AppError::Conflict(_))));

        let unknown =
            interaction_service::add_interaction(&state, &fan, Uuid::new_v4(), kind).await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }

    let seen = recipe_query_service::get_recipe(&state, &Viewer::from(&fan), recipe.id)
        .await?
        .data
        .expect("recipe");
    assert!(seen.is_favorited);
    assert!(seen.is_in_shopping_cart);

    let seen_by_author = recipe_query_service::get_recipe(&state, &Viewer::from(&author), recipe.id)
        .await?
        .data
        .expect("recipe");
    assert!(!seen_by_author.is_favorited);
    assert!(!seen_by_author.is_in_shopping_cart);

    for kind in [InteractionKind::Favorite, InteractionKind::ShoppingCart] {
        interaction_service::remove_interaction(&state, &fan, recipe.id, kind).await?;
        let again = interaction_service::remove_interaction(&state, &fan, recipe.id, kind).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
    Ok(())
}

#[tokio::test]
async fn shopping_list_sums_ingredients_across_recipes() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let author = create_user(&state, "author").await?;
    let shopper = create_user(&state, "shopper").await?;
    let (tag_id, _) = create_tag(&state, "bake").await?;
    let flour_name = unique("flour");
    let eggs_name = unique("eggs");
    let flour = create_ingredient(&state, &flour_name, "g").await?;
    let eggs = create_ingredient(&state, &eggs_name, "pcs").await?;

    let bread = recipe_service::create_recipe(
        &state,
        &author,
        recipe_request("Bread", vec![tag_id], vec![(flour, 200)]),
    )
    .await?
    .data
    .expect("bread");
    let pie = recipe_service::create_recipe(
        &state,
        &author,
        recipe_request("Pie", vec![tag_id], vec![(eggs, 2), (flour, 300)]),
    )
    .await?
    .data
    .expect("pie");

    assert_eq!(
        shopping_list_service::export_shopping_list(&state, &shopper).await?,
        ""
    );

    interaction_service::add_interaction(&state, &shopper, bread.id, InteractionKind::ShoppingCart)
        .await?;
    interaction_service::add_interaction(&state, &shopper, pie.id, InteractionKind::ShoppingCart)
        .await?;

    let lines = shopping_list_service::shopping_list(&state, &shopper).await?;
    let summary: Vec<_> = lines.iter().map(|l| (l.ingredient_id, l.amount)).collect();
    assert_eq!(summary, vec![(flour, 500), (eggs, 2)]);

    let text = shopping_list_service::export_shopping_list(&state, &shopper).await?;
    let expected = format!(
        "1. {}: 500 g\n2. {}: 2 pcs\n",
        shopping_list_service::capitalize(&flour_name),
        shopping_list_service::capitalize(&eggs_name),
    );
    assert_eq!(text, expected);
    Ok(())
}

#[tokio::test]
async fn add_and_remove_are_logged() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let author = create_user(&state, "logged").await?;
    let (tag_id, _) = create_tag(&state, "logged").await?;
    let salt = create_ingredient(&state, &unique("salt"), "g").await?;
    let recipe = recipe_service::create_recipe(
        &state,
        &author,
        recipe_request("Salted water", vec![tag_id], vec![(salt, 5)]),
    )
    .await?
    .data
    .expect("recipe");

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    interaction_service::add_interaction(&state, &author, recipe.id, InteractionKind::ShoppingCart)
        .await?;
    interaction_service::remove_interaction(
        &state,
        &author,
        recipe.id,
        InteractionKind::ShoppingCart,
    )
    .await?;

    let text = logs.text();
    assert!(text.contains("recipe removed"));
    assert!(text.contains(&recipe.id.to_string()));
    assert!(text.contains("shopping cart"));
    Ok(())
}
