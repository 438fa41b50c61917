use std::collections::HashMap;
use std::fmt::Write as _;

use sqlx::FromRow;
use uuid::Uuid;

use crate::{error::AppResult, middleware::auth::AuthUser, state::AppState};

/// One ingredient line of one recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CartIngredientRow {
    pub ingredient_id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// One merged line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub ingredient_id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Sums amounts per ingredient in a single pass, keeping the order in which
/// each ingredient first appears.
pub fn aggregate<I>(rows: I) -> Vec<ShoppingListLine>
where
    I: IntoIterator<Item = CartIngredientRow>,
{
    let mut lines: Vec<ShoppingListLine> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        match index.get(&row.ingredient_id) {
            Some(&at) => lines[at].amount += i64::from(row.amount),
            None => {
                index.insert(row.ingredient_id, lines.len());
                lines.push(ShoppingListLine {
                    ingredient_id: row.ingredient_id,
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                    amount: i64::from(row.amount),
                });
            }
        }
    }

    lines
}

/// `"{n}. {Name}: {amount} {unit}"`, 1-indexed, one line each.
pub fn render(lines: &[ShoppingListLine]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}: {} {}",
            i + 1,
            capitalize(&line.name),
            line.amount,
            line.measurement_unit
        );
    }
    out
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub async fn shopping_list(state: &AppState, user: &AuthUser) -> AppResult<Vec<ShoppingListLine>> {
    let rows = sqlx::query_as::<_, CartIngredientRow>(
        r#"
        SELECT i.id AS ingredient_id, i.name, i.measurement_unit, ri.amount
        FROM shopping_carts sc
        JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = $1
        ORDER BY sc.created_at, sc.id, ri.position
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(aggregate(rows))
}

/// The plain-text export; empty when the cart is empty.
pub async fn export_shopping_list(state: &AppState, user: &AuthUser) -> AppResult<String> {
    let lines = shopping_list(state, user).await?;
    tracing::debug!(user_id = %user.user_id, lines = lines.len(), "shopping list exported");
    Ok(render(&lines))
}
