use recipebox_db::table::User as UserTable;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub enum FindType {
    Id(String),
    Email(String),
    Username(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> recipebox_shared::Result<Option<User>> {
    let mut statement = Query::select()
        .columns([
            UserTable::Id,
            UserTable::Email,
            UserTable::Username,
            UserTable::FirstName,
            UserTable::LastName,
        ])
        .from(UserTable::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(UserTable::Id).eq(id)),
        FindType::Email(email) => statement.and_where(Expr::col(UserTable::Email).eq(email)),
        FindType::Username(username) => {
            statement.and_where(Expr::col(UserTable::Username).eq(username))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, User, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) async fn create(pool: &SqlitePool, user: &User) -> recipebox_shared::Result<()> {
    let statement = Query::insert()
        .into_table(UserTable::Table)
        .columns([
            UserTable::Id,
            UserTable::Email,
            UserTable::Username,
            UserTable::FirstName,
            UserTable::LastName,
            UserTable::CreatedAt,
        ])
        .values_panic([
            user.id.to_owned().into(),
            user.email.to_owned().into(),
            user.username.to_owned().into(),
            user.first_name.to_owned().into(),
            user.last_name.to_owned().into(),
            recipebox_shared::now().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    match sqlx::query_with(&sql, values).execute(pool).await {
        Ok(_) => Ok(()),
        Err(e) if recipebox_shared::is_unique_violation(&e) => {
            recipebox_shared::bail!("A user with that email or username already exists")
        }
        Err(e) => Err(e.into()),
    }
}
