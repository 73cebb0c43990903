use std::{collections::BTreeMap, fmt};

use anyhow::Context;
use serde::Serialize;
use sqlx::prelude::FromRow;

/// Source of the recipes a user saved to their shopping cart.
#[async_trait::async_trait]
pub trait CartStore: Send + Sync {
    async fn list_cart_recipe_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>>;
}

/// One ingredient row of a recipe, already joined with the catalog.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct IngredientAmount {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Source of the ingredient rows of a set of recipes.
#[async_trait::async_trait]
pub trait RecipeIngredientStore: Send + Sync {
    async fn list_ingredients_for_recipes(
        &self,
        recipe_ids: &[String],
    ) -> anyhow::Result<Vec<IngredientAmount>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedLine {
    pub name: String,
    pub unit: String,
    pub total: i64,
}

impl fmt::Display for AggregatedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} {}", self.name, self.total, self.unit)
    }
}

/// Sums every ingredient needed by the recipes in a user's cart.
///
/// Rows are grouped by the (name, unit) value, so two catalog entries that
/// share a name but not a unit stay on separate lines. Lines come out sorted
/// by name then unit, byte-wise.
pub struct ShoppingListAggregator<C, I> {
    carts: C,
    ingredients: I,
}

impl<C: CartStore, I: RecipeIngredientStore> ShoppingListAggregator<C, I> {
    pub fn new(carts: C, ingredients: I) -> Self {
        Self { carts, ingredients }
    }

    #[tracing::instrument(skip(self))]
    pub async fn aggregate(&self, user_id: &str) -> anyhow::Result<Vec<AggregatedLine>> {
        let recipe_ids = self.carts.list_cart_recipe_ids(user_id).await?;
        if recipe_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = self
            .ingredients
            .list_ingredients_for_recipes(&recipe_ids)
            .await?;

        let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
        for row in rows {
            let total = totals
                .entry((row.name, row.measurement_unit))
                .or_default();
            *total = total
                .checked_add(row.amount)
                .context("Shopping list total is too large")?;
        }

        tracing::debug!(recipes = recipe_ids.len(), lines = totals.len(), "aggregated");

        Ok(totals
            .into_iter()
            .map(|((name, unit), total)| AggregatedLine { name, unit, total })
            .collect())
    }
}

/// One line per entry, joined with `\n`, without a trailing newline.
pub fn format(lines: &[AggregatedLine]) -> String {
    lines
        .iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
