use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::recipe_query_service::RecipeFilters,
};

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
}

impl Pagination {
    /// `(page, per_page, offset)`. The offset saturates instead of overflowing.
    pub fn normalize(&self) -> (i64, i64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = u64::try_from((page - 1).saturating_mul(per_page)).unwrap_or(0);
        (page, per_page, offset)
    }
}

/// Query string of the recipe listing. `tags` may repeat.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecipeQuery {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

impl RecipeQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn filters(&self) -> AppResult<RecipeFilters> {
        Ok(RecipeFilters {
            tags: self
                .tags
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            author: self.author,
            is_favorited: parse_flag(self.is_favorited.as_deref(), "is_favorited")?,
            is_in_shopping_cart: parse_flag(
                self.is_in_shopping_cart.as_deref(),
                "is_in_shopping_cart",
            )?,
        })
    }
}

fn parse_flag(value: Option<&str>, name: &str) -> AppResult<bool> {
    match value.map(str::trim) {
        None | Some("") | Some("0") | Some("false") => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some(other) => Err(AppError::BadRequest(format!(
            "`{name}` must be 0 or 1, got `{other}`"
        ))),
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<i64>,
}

impl RecipesLimitQuery {
    /// `None` means no cap.
    pub fn limit(&self) -> AppResult<Option<u64>> {
        match self.recipes_limit {
            None => Ok(None),
            Some(n) if n < 0 => Err(AppError::BadRequest(
                "`recipes_limit` must not be negative".into(),
            )),
            Some(n) => Ok(Some(n as u64)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct SubscriptionQuery {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
    pub recipes_limit: Option<i64>,
}

impl SubscriptionQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn recipes_limit(&self) -> RecipesLimitQuery {
        RecipesLimitQuery {
            recipes_limit: self.recipes_limit,
        }
    }
}
