mod common;

use common::{create_ingredient, create_tag, create_user, recipe_request, setup_state, unique};
use foodgram_api::{
    error::AppError,
    middleware::auth::Viewer,
    routes::params::{RecipesLimitQuery, SubscriptionQuery},
    services::{recipe_service, subscription_service, user_service},
};
use uuid::Uuid;

#[tokio::test]
async fn subscribe_list_and_unsubscribe() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let reader = create_user(&state, "reader").await?;
    let chef = create_user(&state, "chef").await?;
    let (tag_id, _) = create_tag(&state, "mains").await?;
    let beans = create_ingredient(&state, &unique("beans"), "g").await?;
    for name in ["Chili", "Stew", "Burrito"] {
        recipe_service::create_recipe(
            &state,
            &chef,
            recipe_request(name, vec![tag_id], vec![(beans, 100)]),
        )
        .await?;
    }

    let summary = subscription_service::subscribe(
        &state,
        &reader,
        chef.user_id,
        RecipesLimitQuery {
            recipes_limit: Some(2),
        },
    )
    .await?
    .data
    .expect("summary");
    assert_eq!(summary.author.id, chef.user_id);
    assert!(summary.author.is_subscribed);
    assert_eq!(summary.recipes_count, 3);
    assert_eq!(summary.recipes.len(), 2);

    let twice =
        subscription_service::subscribe(&state, &reader, chef.user_id, RecipesLimitQuery::default())
            .await;
    assert!(matches!(twice, Err(AppError::Conflict(_))));

    let profile = user_service::get_user(&state, &Viewer::from(&reader), chef.user_id)
        .await?
        .data
        .expect("profile");
    assert!(profile.is_subscribed);
    let anonymous = user_service::get_user(&state, &Viewer::anonymous(), chef.user_id)
        .await?
        .data
        .expect("profile");
    assert!(!anonymous.is_subscribed);

    let listed = subscription_service::list_subscriptions(
        &state,
        &reader,
        SubscriptionQuery::default(),
    )
    .await?;
    assert_eq!(listed.meta.as_ref().and_then(|m| m.total), Some(1));
    let authors = listed.data.expect("subscriptions").items;
    assert_eq!(authors[0].author.id, chef.user_id);
    assert_eq!(authors[0].recipes.len(), 3);

    subscription_service::unsubscribe(&state, &reader, chef.user_id).await?;
    let again = subscription_service::unsubscribe(&state, &reader, chef.user_id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn invalid_subscriptions_are_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let reader = create_user(&state, "reader").await?;

    let own = subscription_service::subscribe(
        &state,
        &reader,
        reader.user_id,
        RecipesLimitQuery::default(),
    )
    .await;
    assert!(matches!(own, Err(AppError::BadRequest(_))));

    let ghost = subscription_service::subscribe(
        &state,
        &reader,
        Uuid::new_v4(),
        RecipesLimitQuery::default(),
    )
    .await;
    assert!(matches!(ghost, Err(AppError::NotFound(_))));
    Ok(())
}
