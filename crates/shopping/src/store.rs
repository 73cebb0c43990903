use recipebox_db::table::{Cart, Ingredient, RecipeIngredient};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::{CartStore, IngredientAmount, RecipeIngredientStore};

/// Cart and recipe ingredient reads backed by the SQLite read pool.
#[derive(Clone)]
pub struct SqliteStore(SqlitePool);

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }
}

#[async_trait::async_trait]
impl CartStore for SqliteStore {
    async fn list_cart_recipe_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        let (sql, values) = Query::select()
            .column(Cart::RecipeId)
            .from(Cart::Table)
            .and_where(Expr::col(Cart::UserId).eq(user_id))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }
}

#[async_trait::async_trait]
impl RecipeIngredientStore for SqliteStore {
    async fn list_ingredients_for_recipes(
        &self,
        recipe_ids: &[String],
    ) -> anyhow::Result<Vec<IngredientAmount>> {
        if recipe_ids.is_empty() {
            return Ok(vec![]);
        }

        let (sql, values) = Query::select()
            .columns([
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(RecipeIngredient::Table)
            .inner_join(
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .and_where(
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .is_in(recipe_ids.to_vec()),
            )
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientAmount, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }
}
