use recipebox_db::table::Ingredient as IngredientTable;
use recipebox_shared::{State, bail, is_unique_violation};
use sea_query::{Expr, ExprTrait, LikeExpr, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
}

/// Ingredient catalog. Each (name, measurement unit) pair exists once.
#[derive(Clone)]
pub struct Ingredients(pub(crate) State);

impl Ingredients {
    pub async fn create(
        &self,
        name: impl Into<String>,
        measurement_unit: impl Into<String>,
    ) -> recipebox_shared::Result<Ingredient> {
        let name = name.into().trim().to_owned();
        let measurement_unit = measurement_unit.into().trim().to_owned();

        if name.is_empty() || name.chars().count() > 200 {
            bail!("Ingredient name must be between 1 and 200 characters");
        }

        if measurement_unit.is_empty() || measurement_unit.chars().count() > 200 {
            bail!("Measurement unit must be between 1 and 200 characters");
        }

        let ingredient = Ingredient {
            id: ulid::Ulid::new().to_string(),
            name,
            measurement_unit,
        };

        let statement = Query::insert()
            .into_table(IngredientTable::Table)
            .columns([
                IngredientTable::Id,
                IngredientTable::Name,
                IngredientTable::MeasurementUnit,
            ])
            .values_panic([
                ingredient.id.to_owned().into(),
                ingredient.name.to_owned().into(),
                ingredient.measurement_unit.to_owned().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.0.write_db).await {
            Ok(_) => Ok(ingredient),
            Err(e) if is_unique_violation(&e) => bail!("Ingredient already exists"),
            Err(e) => Err(e.into()),
        }
    }

    /// Catalog ordered by name then unit, optionally restricted to names
    /// starting with `name` (ASCII case-insensitive).
    pub async fn list(&self, name: Option<&str>) -> recipebox_shared::Result<Vec<Ingredient>> {
        let mut statement = Query::select()
            .columns([
                IngredientTable::Id,
                IngredientTable::Name,
                IngredientTable::MeasurementUnit,
            ])
            .from(IngredientTable::Table)
            .order_by(IngredientTable::Name, Order::Asc)
            .order_by(IngredientTable::MeasurementUnit, Order::Asc)
            .to_owned();

        if let Some(name) = name.filter(|n| !n.is_empty()) {
            let pattern = format!("{}%", escape_like(name));
            statement.and_where(
                Expr::col(IngredientTable::Name).like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?)
    }

    pub async fn find(&self, id: impl Into<String>) -> recipebox_shared::Result<Option<Ingredient>> {
        let (sql, values) = Query::select()
            .columns([
                IngredientTable::Id,
                IngredientTable::Name,
                IngredientTable::MeasurementUnit,
            ])
            .from(IngredientTable::Table)
            .and_where(Expr::col(IngredientTable::Id).eq(id.into()))
            .limit(1)
            .build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?)
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
