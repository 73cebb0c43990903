use std::collections::HashSet;

use recipebox_db::table::{Subscription, User as UserTable};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;

use crate::{Command, User, repository};

/// A user as seen by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub is_subscribed: bool,
}

impl Command {
    /// Every user ordered by username. `is_subscribed` is false without a viewer.
    pub async fn list(&self, viewer: Option<&str>) -> recipebox_shared::Result<Vec<UserView>> {
        let (sql, values) = Query::select()
            .columns([
                UserTable::Id,
                UserTable::Email,
                UserTable::Username,
                UserTable::FirstName,
                UserTable::LastName,
            ])
            .from(UserTable::Table)
            .order_by(UserTable::Username, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        let users = sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let subscribed = match viewer {
            Some(viewer) => self.subscribed_authors(viewer).await?,
            None => HashSet::new(),
        };

        Ok(users
            .into_iter()
            .map(|user| UserView {
                is_subscribed: subscribed.contains(&user.id),
                user,
            })
            .collect())
    }

    pub async fn view(
        &self,
        viewer: Option<&str>,
        id: impl Into<String>,
    ) -> recipebox_shared::Result<Option<UserView>> {
        let Some(user) =
            repository::find(&self.read_db, repository::FindType::Id(id.into())).await?
        else {
            return Ok(None);
        };

        let is_subscribed = match viewer {
            Some(viewer) => self.subscribed_authors(viewer).await?.contains(&user.id),
            None => false,
        };

        Ok(Some(UserView {
            user,
            is_subscribed,
        }))
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
