use std::{collections::HashSet, ops::Deref};

use recipebox_db::table::{Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag};
use recipebox_shared::{State, bail, not_found};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, Transaction};
use validator::Validate;

use crate::{Favorites, Ingredients, Tags};

mod create;
mod delete;
mod update;

/// Upper bounds for recipe numeric fields.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_amount: i64,
    pub max_cooking_time: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_amount: 32767,
            max_cooking_time: 32767,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    pub cooking_time: i64,
    #[validate(length(min = 1, message = "A recipe needs at least one ingredient."))]
    pub ingredients: Vec<IngredientAmount>,
    #[validate(length(min = 1, message = "A recipe needs at least one tag."))]
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct Command {
    state: State,
    limits: Limits,
    pub favorite: Favorites,
    pub ingredient: Ingredients,
    pub tag: Tags,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State) -> Self {
        Self::with_limits(state, Limits::default())
    }

    pub fn with_limits(state: State, limits: Limits) -> Self {
        Self {
            favorite: Favorites(state.clone()),
            ingredient: Ingredients(state.clone()),
            tag: Tags(state.clone()),
            limits,
            state,
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Validates `input` and collapses repeated ingredients and tags,
    /// keeping the first occurrence of each.
    async fn prepare(&self, mut input: RecipeInput) -> recipebox_shared::Result<RecipeInput> {
        input.validate()?;

        if !(1..=self.limits.max_cooking_time).contains(&input.cooking_time) {
            bail!(
                "Cooking time must be between 1 and {}",
                self.limits.max_cooking_time
            );
        }

        let mut seen = HashSet::new();
        input.ingredients.retain(|i| seen.insert(i.id.to_owned()));

        let mut seen = HashSet::new();
        input.tags.retain(|t| seen.insert(t.to_owned()));

        for ingredient in input.ingredients.iter() {
            if !(1..=self.limits.max_amount).contains(&ingredient.amount) {
                bail!(
                    "Ingredient amount must be between 1 and {}",
                    self.limits.max_amount
                );
            }
        }

        let ids = input.ingredients.iter().map(|i| i.id.to_owned());
        if let Some(id) = self.first_missing(Ingredient::Table, Ingredient::Id, ids).await? {
            not_found!("Ingredient {id} not found");
        }

        let ids = input.tags.iter().cloned();
        if let Some(id) = self.first_missing(Tag::Table, Tag::Id, ids).await? {
            not_found!("Tag {id} not found");
        }

        Ok(input)
    }

    async fn first_missing(
        &self,
        table: impl sea_query::Iden + 'static,
        column: impl sea_query::Iden + Clone + 'static,
        ids: impl Iterator<Item = String>,
    ) -> recipebox_shared::Result<Option<String>> {
        let ids = ids.collect::<Vec<_>>();
        let (sql, values) = Query::select()
            .column(column.clone())
            .from(table)
            .and_where(Expr::col(column).is_in(ids.to_vec()))
            .build_sqlx(SqliteQueryBuilder);

        let found = sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .collect::<HashSet<_>>();

        Ok(ids.into_iter().find(|id| !found.contains(id)))
    }

    pub(crate) async fn author_of(
        &self,
        id: impl Into<String>,
    ) -> recipebox_shared::Result<Option<String>> {
        let (sql, values) = Query::select()
            .column(Recipe::AuthorId)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id.into()))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}

async fn insert_children(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: &str,
    input: &RecipeInput,
) -> recipebox_shared::Result<()> {
    let mut statement = Query::insert()
        .into_table(RecipeIngredient::Table)
        .columns([
            RecipeIngredient::RecipeId,
            RecipeIngredient::IngredientId,
            RecipeIngredient::Amount,
        ])
        .to_owned();

    for ingredient in input.ingredients.iter() {
        statement.values_panic([
            recipe_id.into(),
            ingredient.id.to_owned().into(),
            ingredient.amount.into(),
        ]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut **tx).await?;

    let mut statement = Query::insert()
        .into_table(RecipeTag::Table)
        .columns([RecipeTag::RecipeId, RecipeTag::TagId])
        .to_owned();

    for tag_id in input.tags.iter() {
        statement.values_panic([recipe_id.into(), tag_id.to_owned().into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut **tx).await?;

    Ok(())
}
