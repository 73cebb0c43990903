use recipebox_db::table::Favorite;
use recipebox_shared::{
    Relation, State, bail, is_foreign_key_violation, is_unique_violation, not_found,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

#[derive(Clone)]
pub struct Favorites(pub(crate) State);

#[async_trait::async_trait]
impl Relation for Favorites {
    async fn add(&self, user_id: &str, recipe_id: &str) -> recipebox_shared::Result<()> {
        let statement = Query::insert()
            .into_table(Favorite::Table)
            .columns([Favorite::UserId, Favorite::RecipeId, Favorite::CreatedAt])
            .values_panic([
                user_id.into(),
                recipe_id.into(),
                recipebox_shared::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.0.write_db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => bail!("Recipe is already in favorites"),
            Err(e) if is_foreign_key_violation(&e) => not_found!("Recipe not found"),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, user_id: &str, recipe_id: &str) -> recipebox_shared::Result<()> {
        let (sql, values) = Query::delete()
            .from_table(Favorite::Table)
            .and_where(Expr::col(Favorite::UserId).eq(user_id))
            .and_where(Expr::col(Favorite::RecipeId).eq(recipe_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            bail!("Recipe is not in favorites");
        }

        Ok(())
    }

    async fn contains(&self, user_id: &str, recipe_id: &str) -> recipebox_shared::Result<bool> {
        let (sql, values) = Query::select()
            .column(Favorite::RecipeId)
            .from(Favorite::Table)
            .and_where(Expr::col(Favorite::UserId).eq(user_id))
            .and_where(Expr::col(Favorite::RecipeId).eq(recipe_id))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?
            .is_some())
    }
}
