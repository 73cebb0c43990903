use std::sync::LazyLock;

use recipebox_db::table::Tag as TagTable;
use recipebox_shared::{State, bail, is_unique_violation};
use regex::Regex;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

static RE_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());
static RE_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(
        length(min = 1, max = 200),
        regex(path = *RE_SLUG, message = "Only letters, digits, - and _ are allowed.")
    )]
    pub slug: String,
    #[validate(regex(path = *RE_COLOR, message = "Color must look like #RRGGBB."))]
    pub color: String,
}

#[derive(Clone)]
pub struct Tags(pub(crate) State);

impl Tags {
    pub async fn create(&self, input: TagInput) -> recipebox_shared::Result<Tag> {
        input.validate()?;

        let tag = Tag {
            id: ulid::Ulid::new().to_string(),
            name: input.name,
            slug: input.slug,
            color: input.color.to_uppercase(),
        };

        let statement = Query::insert()
            .into_table(TagTable::Table)
            .columns([TagTable::Id, TagTable::Name, TagTable::Slug, TagTable::Color])
            .values_panic([
                tag.id.to_owned().into(),
                tag.name.to_owned().into(),
                tag.slug.to_owned().into(),
                tag.color.to_owned().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.0.write_db).await {
            Ok(_) => Ok(tag),
            Err(e) if is_unique_violation(&e) => {
                bail!("A tag with that name, slug or color already exists")
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> recipebox_shared::Result<Vec<Tag>> {
        let (sql, values) = Query::select()
            .columns([TagTable::Id, TagTable::Name, TagTable::Slug, TagTable::Color])
            .from(TagTable::Table)
            .order_by(TagTable::Name, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Tag, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?)
    }

    pub async fn find(&self, id: impl Into<String>) -> recipebox_shared::Result<Option<Tag>> {
        let (sql, values) = Query::select()
            .columns([TagTable::Id, TagTable::Name, TagTable::Slug, TagTable::Color])
            .from(TagTable::Table)
            .and_where(Expr::col(TagTable::Id).eq(id.into()))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Tag, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?)
    }
}
