use std::{path::PathBuf, str::FromStr};

use recipebox_db::{Migrate, Plan};
use recipebox_recipe::{Command, Ingredient, IngredientAmount, RecipeInput, Tag, TagInput};
use recipebox_shared::State;
use recipebox_user::{RegisterInput, User};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    recipebox_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(State::single(pool))
}

#[allow(dead_code)]
pub async fn create_user(state: &State, name: &str) -> anyhow::Result<User> {
    let cmd = recipebox_user::Command::new(state.clone());

    Ok(cmd
        .register(RegisterInput {
            email: format!("{name}@recipebox.localhost"),
            username: name.to_owned(),
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
        })
        .await?)
}

#[allow(dead_code)]
pub async fn create_ingredient(cmd: &Command, name: &str, unit: &str) -> anyhow::Result<Ingredient> {
    Ok(cmd.ingredient.create(name, unit).await?)
}

#[allow(dead_code)]
pub async fn create_tag(cmd: &Command, name: &str, color: &str) -> anyhow::Result<Tag> {
    Ok(cmd
        .tag
        .create(TagInput {
            name: name.to_owned(),
            slug: name.to_lowercase(),
            color: color.to_owned(),
        })
        .await?)
}

#[allow(dead_code)]
pub fn recipe_input(name: &str, ingredients: &[(&Ingredient, i64)], tags: &[&Tag]) -> RecipeInput {
    RecipeInput {
        name: name.to_owned(),
        text: format!("How to cook {name}"),
        cooking_time: 30,
        ingredients: ingredients
            .iter()
            .map(|(i, amount)| IngredientAmount {
                id: i.id.to_owned(),
                amount: *amount,
            })
            .collect(),
        tags: tags.iter().map(|t| t.id.to_owned()).collect(),
    }
}
