use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        catalog::{IngredientList, TagList},
        recipes::{IngredientAmountInput, RecipeList, RecipeWriteRequest},
        users::{SubscriptionList, UserList},
    },
    models::{AuthorWithRecipes, Ingredient, Recipe, RecipeIngredient, ShortRecipe, Tag, User},
    response::{ApiResponse, Empty, Meta},
    routes::{auth, catalog, health, params, recipes, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        users::list_users,
        users::me,
        users::get_user,
        users::list_subscriptions,
        users::subscribe,
        users::unsubscribe,
        catalog::list_tags,
        catalog::get_tag,
        catalog::list_ingredients,
        catalog::get_ingredient,
        recipes::list_recipes,
        recipes::get_recipe,
        recipes::create_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        recipes::add_favorite,
        recipes::remove_favorite,
        recipes::add_to_shopping_cart,
        recipes::remove_from_shopping_cart,
        recipes::download_shopping_cart
    ),
    components(
        schemas(
            User,
            Tag,
            Ingredient,
            Recipe,
            RecipeIngredient,
            ShortRecipe,
            AuthorWithRecipes,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            RecipeWriteRequest,
            IngredientAmountInput,
            RecipeList,
            TagList,
            IngredientList,
            UserList,
            SubscriptionList,
            Empty,
            params::Pagination,
            params::RecipeQuery,
            params::IngredientQuery,
            params::RecipesLimitQuery,
            params::SubscriptionQuery,
            Meta,
            ApiResponse<Recipe>,
            ApiResponse<RecipeList>,
            ApiResponse<User>,
            ApiResponse<UserList>,
            ApiResponse<SubscriptionList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "User profile endpoints"),
        (name = "Subscriptions", description = "Author subscription endpoints"),
        (name = "Tags", description = "Tag catalog"),
        (name = "Ingredients", description = "Ingredient catalog"),
        (name = "Recipes", description = "Recipe endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
