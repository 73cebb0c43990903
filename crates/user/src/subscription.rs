use std::collections::HashMap;

use recipebox_db::table::{Recipe, Subscription, User};
use recipebox_shared::{
    Relation, State, bail, is_foreign_key_violation, is_unique_violation, not_found,
};
use sea_query::{Alias, Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub cooking_time: i64,
}

/// An author as seen from a subscriber, with their latest recipes.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribedAuthor {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: i64,
}

#[derive(FromRow)]
struct AuthorRow {
    id: String,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    recipes_count: i64,
}

#[derive(FromRow)]
struct AuthorRecipeRow {
    author_id: String,
    #[sqlx(flatten)]
    recipe: RecipeSummary,
}

#[derive(Clone)]
pub struct Subscriptions(pub(crate) State);

#[async_trait::async_trait]
impl Relation for Subscriptions {
    async fn add(&self, user_id: &str, author_id: &str) -> recipebox_shared::Result<()> {
        if user_id == author_id {
            bail!("You cannot subscribe to yourself");
        }

        let statement = Query::insert()
            .into_table(Subscription::Table)
            .columns([
                Subscription::UserId,
                Subscription::AuthorId,
                Subscription::CreatedAt,
            ])
            .values_panic([
                user_id.into(),
                author_id.into(),
                recipebox_shared::now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.0.write_db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => bail!("Already subscribed to this author"),
            Err(e) if is_foreign_key_violation(&e) => not_found!("User not found"),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, user_id: &str, author_id: &str) -> recipebox_shared::Result<()> {
        let (sql, values) = Query::delete()
            .from_table(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            bail!("You are not subscribed to this author");
        }

        Ok(())
    }

    async fn contains(&self, user_id: &str, author_id: &str) -> recipebox_shared::Result<bool> {
        let (sql, values) = Query::select()
            .column(Subscription::AuthorId)
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?
            .is_some())
    }
}

fn author_select() -> SelectStatement {
    Query::select()
        .columns([
            (User::Table, User::Id),
            (User::Table, User::Email),
            (User::Table, User::Username),
            (User::Table, User::FirstName),
            (User::Table, User::LastName),
        ])
        .expr_as(
            Func::count(Expr::col((Recipe::Table, Recipe::Id))),
            Alias::new("recipes_count"),
        )
        .from(User::Table)
        .left_join(
            Recipe::Table,
            Expr::col((Recipe::Table, Recipe::AuthorId)).equals((User::Table, User::Id)),
        )
        .group_by_col((User::Table, User::Id))
        .to_owned()
}

impl Subscriptions {
    /// Authors followed by `user_id`, ordered by username. Each carries its
    /// newest recipes, at most `recipes_limit` of them when set.
    pub async fn list(
        &self,
        user_id: impl Into<String>,
        recipes_limit: Option<usize>,
    ) -> recipebox_shared::Result<Vec<SubscribedAuthor>> {
        let followed = Query::select()
            .column(Subscription::AuthorId)
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(user_id.into()))
            .to_owned();

        let (sql, values) = author_select()
            .and_where(Expr::col((User::Table, User::Id)).in_subquery(followed))
            .order_by((User::Table, User::Username), Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, AuthorRow, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?;

        self.load_authors(rows, |_| true, recipes_limit).await
    }

    /// One author as seen by `user_id`, in the same shape as [`Subscriptions::list`].
    pub async fn author(
        &self,
        user_id: &str,
        author_id: &str,
        recipes_limit: Option<usize>,
    ) -> recipebox_shared::Result<Option<SubscribedAuthor>> {
        let (sql, values) = author_select()
            .and_where(Expr::col((User::Table, User::Id)).eq(author_id))
            .build_sqlx(SqliteQueryBuilder);

        let Some(row) = sqlx::query_as_with::<_, AuthorRow, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?
        else {
            return Ok(None);
        };

        let subscribed = self.contains(user_id, author_id).await?;

        Ok(self
            .load_authors(vec![row], |_| subscribed, recipes_limit)
            .await?
            .pop())
    }

    async fn load_authors(
        &self,
        rows: Vec<AuthorRow>,
        is_subscribed: impl Fn(&str) -> bool,
        recipes_limit: Option<usize>,
    ) -> recipebox_shared::Result<Vec<SubscribedAuthor>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids = rows.iter().map(|r| r.id.to_owned()).collect::<Vec<_>>();
        let (sql, values) = Query::select()
            .columns([
                Recipe::AuthorId,
                Recipe::Id,
                Recipe::Name,
                Recipe::CookingTime,
            ])
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::AuthorId).is_in(ids))
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc)
            .build_sqlx(SqliteQueryBuilder);

        let mut recipes: HashMap<String, Vec<RecipeSummary>> = HashMap::new();
        for row in sqlx::query_as_with::<_, AuthorRecipeRow, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?
        {
            let author = recipes.entry(row.author_id).or_default();
            if recipes_limit.is_none_or(|limit| author.len() < limit) {
                author.push(row.recipe);
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| SubscribedAuthor {
                is_subscribed: is_subscribed(&row.id),
                recipes: recipes.remove(&row.id).unwrap_or_default(),
                id: row.id,
                email: row.email,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                recipes_count: row.recipes_count,
            })
            .collect())
    }
}
