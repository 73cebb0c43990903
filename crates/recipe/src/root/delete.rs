use recipebox_db::table::Recipe;
use recipebox_shared::{forbidden, not_found};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use super::Command;

impl Command {
    pub async fn delete(
        &self,
        user_id: impl Into<String>,
        id: impl Into<String>,
    ) -> recipebox_shared::Result<()> {
        let user_id = user_id.into();
        let id = id.into();

        let Some(author_id) = self.author_of(&id).await? else {
            not_found!("Recipe not found");
        };

        if author_id != user_id {
            forbidden!("Only the author can delete this recipe");
        }

        let (sql, values) = Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(recipe_id = %id, "recipe deleted");

        Ok(())
    }
}
