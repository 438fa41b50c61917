use std::collections::HashSet;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::{
    entity::{
        Favorites, ShoppingCarts, Subscriptions, favorites::Column as FavCol,
        shopping_carts::Column as CartCol, subscriptions::Column as SubCol,
    },
    error::AppResult,
    middleware::auth::Viewer,
};

/// The viewer's favorite, cart and subscription sets, restricted to the rows
/// of one response. Loaded with one query per set; empty for anonymous viewers.
#[derive(Debug, Clone, Default)]
pub struct Membership {
    favorites: HashSet<Uuid>,
    cart: HashSet<Uuid>,
    subscribed: HashSet<Uuid>,
}

impl Membership {
    pub async fn load<C: ConnectionTrait>(
        db: &C,
        viewer: &Viewer,
        recipe_ids: &[Uuid],
        author_ids: &[Uuid],
    ) -> AppResult<Self> {
        let Some(user_id) = viewer.user_id() else {
            return Ok(Self::default());
        };
        if recipe_ids.is_empty() && author_ids.is_empty() {
            return Ok(Self::default());
        }

        let favorites = Favorites::find()
            .select_only()
            .column(FavCol::RecipeId)
            .filter(FavCol::UserId.eq(user_id))
            .filter(FavCol::RecipeId.is_in(recipe_ids.to_vec()))
            .into_tuple::<Uuid>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let cart = ShoppingCarts::find()
            .select_only()
            .column(CartCol::RecipeId)
            .filter(CartCol::UserId.eq(user_id))
            .filter(CartCol::RecipeId.is_in(recipe_ids.to_vec()))
            .into_tuple::<Uuid>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let subscribed = subscribed_authors(db, viewer, author_ids).await?;

        Ok(Self {
            favorites,
            cart,
            subscribed,
        })
    }

    pub fn is_favorited(&self, recipe_id: Uuid) -> bool {
        self.favorites.contains(&recipe_id)
    }

    pub fn is_in_shopping_cart(&self, recipe_id: Uuid) -> bool {
        self.cart.contains(&recipe_id)
    }

    pub fn is_subscribed(&self, author_id: Uuid) -> bool {
        self.subscribed.contains(&author_id)
    }
}

/// Which of `author_ids` the viewer follows.
pub async fn subscribed_authors<C: ConnectionTrait>(
    db: &C,
    viewer: &Viewer,
    author_ids: &[Uuid],
) -> AppResult<HashSet<Uuid>> {
    let Some(user_id) = viewer.user_id() else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let followed = Subscriptions::find()
        .select_only()
        .column(SubCol::AuthorId)
        .filter(SubCol::UserId.eq(user_id))
        .filter(SubCol::AuthorId.is_in(author_ids.to_vec()))
        .into_tuple::<Uuid>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    Ok(followed)
}
