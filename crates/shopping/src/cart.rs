use recipebox_db::table::Cart as CartTable;
use recipebox_shared::{
    Relation, State, bail, is_foreign_key_violation, is_unique_violation, not_found,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

/// Recipes a user intends to cook.
#[derive(Clone)]
pub struct Cart(pub(crate) State);

#[async_trait::async_trait]
impl Relation for Cart {
    async fn add(&self, user_id: &str, recipe_id: &str) -> recipebox_shared::Result<()> {
        let statement = Query::insert()
            .into_table(CartTable::Table)
            .columns([CartTable::UserId, CartTable::RecipeId, CartTable::CreatedAt])
            .values_panic([
                user_id.into(),
                recipe_id.into(),
                recipebox_shared::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.0.write_db).await {
            Ok(_) => {
                tracing::debug!(user_id, recipe_id, "recipe added to cart");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => bail!("Recipe is already in the shopping cart"),
            Err(e) if is_foreign_key_violation(&e) => not_found!("Recipe not found"),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, user_id: &str, recipe_id: &str) -> recipebox_shared::Result<()> {
        let (sql, values) = Query::delete()
            .from_table(CartTable::Table)
            .and_where(Expr::col(CartTable::UserId).eq(user_id))
            .and_where(Expr::col(CartTable::RecipeId).eq(recipe_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            bail!("Recipe is not in the shopping cart");
        }

        Ok(())
    }

    async fn contains(&self, user_id: &str, recipe_id: &str) -> recipebox_shared::Result<bool> {
        let (sql, values) = Query::select()
            .column(CartTable::RecipeId)
            .from(CartTable::Table)
            .and_where(Expr::col(CartTable::UserId).eq(user_id))
            .and_where(Expr::col(CartTable::RecipeId).eq(recipe_id))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?
            .is_some())
    }
}
