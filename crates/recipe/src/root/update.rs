use recipebox_db::table::{Recipe, RecipeIngredient, RecipeTag};
use recipebox_shared::{forbidden, not_found};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use super::{Command, RecipeInput, insert_children};

impl Command {
    /// Replaces every field of the recipe, including its ingredient and tag lists.
    pub async fn update(
        &self,
        user_id: impl Into<String>,
        id: impl Into<String>,
        input: RecipeInput,
    ) -> recipebox_shared::Result<()> {
        let user_id = user_id.into();
        let id = id.into();

        let Some(author_id) = self.author_of(&id).await? else {
            not_found!("Recipe not found");
        };

        if author_id != user_id {
            forbidden!("Only the author can edit this recipe");
        }

        let input = self.prepare(input).await?;
        let mut tx = self.write_db.begin().await?;

        let (sql, values) = Query::update()
            .table(Recipe::Table)
            .values([
                (Recipe::Name, input.name.to_owned().into()),
                (Recipe::Text, input.text.to_owned().into()),
                (Recipe::CookingTime, input.cooking_time.into()),
            ])
            .and_where(Expr::col(Recipe::Id).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(RecipeTag::Table)
            .and_where(Expr::col(RecipeTag::RecipeId).eq(id.as_str()))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        insert_children(&mut tx, &id, &input).await?;
        tx.commit().await?;

        tracing::info!(recipe_id = %id, "recipe updated");

        Ok(())
    }
}
