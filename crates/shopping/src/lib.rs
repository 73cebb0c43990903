mod aggregator;
mod cart;
mod store;

use std::ops::Deref;

pub use aggregator::{
    AggregatedLine, CartStore, IngredientAmount, RecipeIngredientStore, ShoppingListAggregator,
    format,
};
pub use cart::Cart;
pub use store::SqliteStore;

#[derive(Clone)]
pub struct Command {
    state: recipebox_shared::State,
    pub cart: Cart,
}

impl Deref for Command {
    type Target = recipebox_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: recipebox_shared::State) -> Self {
        Self {
            cart: Cart(state.clone()),
            state,
        }
    }

    pub fn aggregator(&self) -> ShoppingListAggregator<SqliteStore, SqliteStore> {
        let store = SqliteStore::new(self.read_db.clone());

        ShoppingListAggregator::new(store.clone(), store)
    }

    /// Renders the shopping list of `user_id` as downloadable text.
    pub async fn download(&self, user_id: &str) -> anyhow::Result<String> {
        let lines = self.aggregator().aggregate(user_id).await?;

        Ok(format(&lines))
    }
}
