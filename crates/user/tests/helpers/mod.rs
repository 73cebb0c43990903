use std::{path::PathBuf, str::FromStr};

use recipebox_db::{Migrate, Plan};
use recipebox_shared::State;
use recipebox_user::{Command, RegisterInput, User};
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
pub fn register_input(name: impl Into<String>) -> RegisterInput {
    let name = name.into();

    RegisterInput {
        email: format!("{name}@recipebox.localhost"),
        username: name.to_owned(),
        first_name: "John".to_owned(),
        last_name: "Doe".to_owned(),
    }
}

#[allow(dead_code)]
pub async fn create_user(cmd: &Command, name: impl Into<String>) -> anyhow::Result<User> {
    Ok(cmd.register(register_input(name)).await?)
}

#[allow(dead_code)]
pub async fn insert_recipe(
    state: &State,
    author: &User,
    name: &str,
    created_at: i64,
) -> anyhow::Result<String> {
    use recipebox_db::table::Recipe;
    use sea_query::{Query, SqliteQueryBuilder};
    use sea_query_sqlx::SqlxBinder;

    let id = format!("{}-{name}", author.username);
    let (sql, values) = Query::insert()
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
            author.id.to_owned().into(),
            name.into(),
            format!("How to cook {name}").into(),
            20.into(),
            created_at.into(),
        ])
        .build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values)
        .execute(&state.write_db)
        .await?;

    Ok(id)
}
