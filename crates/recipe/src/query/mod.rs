use std::collections::{HashMap, HashSet};

use recipebox_db::table::{
    Cart, Favorite, Ingredient, Recipe, RecipeIngredient, RecipeTag, Subscription, Tag, User,
};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::prelude::FromRow;

use crate::{Command, Tag as TagView};

#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RecipeIngredientView {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: String,
    pub author: Author,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub created_at: i64,
    pub tags: Vec<TagView>,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Recipe listing filter. `tags` holds slugs and matches recipes carrying any of them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilter {
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_favorited: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_in_shopping_cart: Option<bool>,
}

/// Accepts `1`/`0` as well as `true`/`false`.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    let Some(value) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match value.as_str() {
        "" => Ok(None),
        "1" | "true" => Ok(Some(true)),
        "0" | "false" => Ok(Some(false)),
        other => Err(serde::de::Error::custom(format!(
            "expected 0, 1, true or false, got {other}"
        ))),
    }
}

#[derive(FromRow)]
struct RecipeRow {
    id: String,
    name: String,
    text: String,
    cooking_time: i64,
    created_at: i64,
    author_id: String,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
}

#[derive(FromRow)]
struct RecipeTagRow {
    recipe_id: String,
    #[sqlx(flatten)]
    tag: TagView,
}

#[derive(FromRow)]
struct RecipeIngredientRow {
    recipe_id: String,
    #[sqlx(flatten)]
    ingredient: RecipeIngredientView,
}

fn base_select() -> SelectStatement {
    Query::select()
        .columns([
            (Recipe::Table, Recipe::Id),
            (Recipe::Table, Recipe::Name),
            (Recipe::Table, Recipe::Text),
            (Recipe::Table, Recipe::CookingTime),
            (Recipe::Table, Recipe::CreatedAt),
            (Recipe::Table, Recipe::AuthorId),
        ])
        .columns([
            (User::Table, User::Email),
            (User::Table, User::Username),
            (User::Table, User::FirstName),
            (User::Table, User::LastName),
        ])
        .from(Recipe::Table)
        .inner_join(
            User::Table,
            Expr::col((User::Table, User::Id)).equals((Recipe::Table, Recipe::AuthorId)),
        )
        .to_owned()
}

impl Command {
    pub async fn find(
        &self,
        viewer: Option<&str>,
        id: impl Into<String>,
    ) -> recipebox_shared::Result<Option<RecipeView>> {
        let (sql, values) = base_select()
            .and_where(Expr::col((Recipe::Table, Recipe::Id)).eq(id.into()))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        let Some(row) = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.load_views(viewer, vec![row]).await?.pop())
    }

    /// Recipes matching `filter`, newest first. Without a viewer nothing is
    /// favorited or in a cart.
    pub async fn list(
        &self,
        viewer: Option<&str>,
        filter: RecipeFilter,
    ) -> recipebox_shared::Result<Vec<RecipeView>> {
        let mut statement = base_select()
            .order_by((Recipe::Table, Recipe::CreatedAt), Order::Desc)
            .order_by((Recipe::Table, Recipe::Id), Order::Desc)
            .to_owned();

        if let Some(author) = filter.author {
            statement.and_where(Expr::col((Recipe::Table, Recipe::AuthorId)).eq(author));
        }

        if !filter.tags.is_empty() {
            let tagged = Query::select()
                .column((RecipeTag::Table, RecipeTag::RecipeId))
                .from(RecipeTag::Table)
                .inner_join(
                    Tag::Table,
                    Expr::col((Tag::Table, Tag::Id)).equals((RecipeTag::Table, RecipeTag::TagId)),
                )
                .and_where(Expr::col((Tag::Table, Tag::Slug)).is_in(filter.tags))
                .to_owned();

            statement.and_where(Expr::col((Recipe::Table, Recipe::Id)).in_subquery(tagged));
        }

        for (wanted, table) in [
            (filter.is_favorited, RelationTable::Favorite),
            (filter.is_in_shopping_cart, RelationTable::Cart),
        ] {
            match (wanted, viewer) {
                (None, _) | (Some(false), None) => {}
                (Some(true), None) => return Ok(vec![]),
                (Some(wanted), Some(viewer)) => {
                    let ids = table.recipe_ids(viewer, None);
                    let col = Expr::col((Recipe::Table, Recipe::Id));
                    statement.and_where(if wanted {
                        col.in_subquery(ids)
                    } else {
                        col.not_in_subquery(ids)
                    });
                }
            }
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        self.load_views(viewer, rows).await
    }

    async fn load_views(
        &self,
        viewer: Option<&str>,
        rows: Vec<RecipeRow>,
    ) -> recipebox_shared::Result<Vec<RecipeView>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids = rows.iter().map(|r| r.id.to_owned()).collect::<Vec<_>>();

        let (sql, values) = Query::select()
            .column((RecipeTag::Table, RecipeTag::RecipeId))
            .columns([
                (Tag::Table, Tag::Id),
                (Tag::Table, Tag::Name),
                (Tag::Table, Tag::Slug),
                (Tag::Table, Tag::Color),
            ])
            .from(RecipeTag::Table)
            .inner_join(
                Tag::Table,
                Expr::col((Tag::Table, Tag::Id)).equals((RecipeTag::Table, RecipeTag::TagId)),
            )
            .and_where(Expr::col((RecipeTag::Table, RecipeTag::RecipeId)).is_in(ids.to_vec()))
            .order_by((Tag::Table, Tag::Name), Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let mut tags: HashMap<String, Vec<TagView>> = HashMap::new();
        for row in sqlx::query_as_with::<_, RecipeTagRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
        {
            tags.entry(row.recipe_id).or_default().push(row.tag);
        }

        let (sql, values) = Query::select()
            .column((RecipeIngredient::Table, RecipeIngredient::RecipeId))
            .columns([
                (Ingredient::Table, Ingredient::Id),
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
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId)).is_in(ids.to_vec()),
            )
            .order_by((Ingredient::Table, Ingredient::Name), Order::Asc)
            .order_by((Ingredient::Table, Ingredient::MeasurementUnit), Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let mut ingredients: HashMap<String, Vec<RecipeIngredientView>> = HashMap::new();
        for row in sqlx::query_as_with::<_, RecipeIngredientRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
        {
            ingredients
                .entry(row.recipe_id)
                .or_default()
                .push(row.ingredient);
        }

        let (favorited, in_cart, subscribed) = match viewer {
            Some(viewer) => (
                self.viewer_set(RelationTable::Favorite.recipe_ids(viewer, Some(ids.as_slice())))
                    .await?,
                self.viewer_set(RelationTable::Cart.recipe_ids(viewer, Some(ids.as_slice())))
                    .await?,
                self.subscribed_authors(viewer).await?,
            ),
            None => Default::default(),
        };

        Ok(rows
            .into_iter()
            .map(|row| RecipeView {
                tags: tags.remove(&row.id).unwrap_or_default(),
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                is_favorited: favorited.contains(&row.id),
                is_in_shopping_cart: in_cart.contains(&row.id),
                author: Author {
                    is_subscribed: subscribed.contains(&row.author_id),
                    id: row.author_id,
                    email: row.email,
                    username: row.username,
                    first_name: row.first_name,
                    last_name: row.last_name,
                },
                id: row.id,
                name: row.name,
                text: row.text,
                cooking_time: row.cooking_time,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn viewer_set(
        &self,
        statement: SelectStatement,
    ) -> recipebox_shared::Result<HashSet<String>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .collect())
    }

    async fn subscribed_authors(&self, viewer: &str) -> recipebox_shared::Result<HashSet<String>> {
        let (sql, values) = Query::select()
            .column(Subscription::AuthorId)
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(viewer))
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .collect())
    }
}

#[derive(Clone, Copy)]
enum RelationTable {
    Favorite,
    Cart,
}

impl RelationTable {
    /// Ids of the recipes `user_id` holds in this relation, optionally
    /// restricted to `within`.
    fn recipe_ids(self, user_id: &str, within: Option<&[String]>) -> SelectStatement {
        let (mut statement, recipe_id) = match self {
            Self::Favorite => (
                Query::select()
                    .column(Favorite::RecipeId)
                    .from(Favorite::Table)
                    .and_where(Expr::col(Favorite::UserId).eq(user_id))
                    .to_owned(),
                Expr::col(Favorite::RecipeId),
            ),
            Self::Cart => (
                Query::select()
                    .column(Cart::RecipeId)
                    .from(Cart::Table)
                    .and_where(Expr::col(Cart::UserId).eq(user_id))
                    .to_owned(),
                Expr::col(Cart::RecipeId),
            ),
        };

        if let Some(ids) = within {
            statement.and_where(recipe_id.is_in(ids.to_vec()));
        }

        statement
    }
}
