use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{AuthorWithRecipes, User};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SubscriptionList {
    #[schema(value_type = Vec<AuthorWithRecipes>)]
    pub items: Vec<AuthorWithRecipes>,
}
