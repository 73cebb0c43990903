use recipebox_db::table::Recipe;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use super::{Command, RecipeInput, insert_children};

impl Command {
    /// Publishes a recipe for `author_id` and returns its id.
    pub async fn create(
        &self,
        author_id: impl Into<String>,
        input: RecipeInput,
    ) -> recipebox_shared::Result<String> {
        let author_id = author_id.into();
        let input = self.prepare(input).await?;
        let id = ulid::Ulid::new().to_string();

        let statement = Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::Id,
                Recipe::AuthorId,
                Recipe::Name,
                Recipe::Text,
                Recipe::CookingTime,
                Recipe::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                author_id.to_owned().into(),
                input.name.to_owned().into(),
                input.text.to_owned().into(),
                input.cooking_time.into(),
                recipebox_shared::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let mut tx = self.write_db.begin().await?;
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        insert_children(&mut tx, &id, &input).await?;
        tx.commit().await?;

        tracing::info!(recipe_id = %id, author_id = %author_id, "recipe created");

        Ok(id)
    }
}
