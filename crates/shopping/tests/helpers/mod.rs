use std::{path::PathBuf, str::FromStr};

use recipebox_db::{Migrate, Plan};
use recipebox_recipe::{IngredientAmount, RecipeInput, TagInput};
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

/// Catalog of ingredients keyed by (name, unit), created on first use.
pub struct Kitchen {
    pub recipe: recipebox_recipe::Command,
    tag_id: String,
}

impl Kitchen {
    pub async fn new(state: &State) -> anyhow::Result<Self> {
        let recipe = recipebox_recipe::Command::new(state.clone());
        let tag = recipe
            .tag
            .create(TagInput {
                name: "Dinner".to_owned(),
                slug: "dinner".to_owned(),
                color: "#0000FF".to_owned(),
            })
            .await?;

        Ok(Self {
            recipe,
            tag_id: tag.id,
        })
    }

    async fn ingredient_id(&self, name: &str, unit: &str) -> anyhow::Result<String> {
        let existing = self
            .recipe
            .ingredient
            .list(Some(name))
            .await?
            .into_iter()
            .find(|i| i.name == name && i.measurement_unit == unit);

        match existing {
            Some(ingredient) => Ok(ingredient.id),
            None => Ok(self.recipe.ingredient.create(name, unit).await?.id),
        }
    }

    pub async fn recipe(
        &self,
        author: &User,
        name: &str,
        rows: &[(&str, &str, i64)],
    ) -> anyhow::Result<String> {
        let mut ingredients = vec![];
        for (ingredient, unit, amount) in rows {
            ingredients.push(IngredientAmount {
                id: self.ingredient_id(ingredient, unit).await?,
                amount: *amount,
            });
        }

        let input = RecipeInput {
            name: name.to_owned(),
            text: format!("How to cook {name}"),
            cooking_time: 45,
            ingredients,
            tags: vec![self.tag_id.to_owned()],
        };

        Ok(self.recipe.create(&author.id, input).await?)
    }
}
