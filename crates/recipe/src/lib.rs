mod favorite;
mod ingredient;
mod query;
mod root;
mod tag;

pub use favorite::Favorites;
pub use ingredient::{Ingredient, Ingredients};
pub use query::{Author, RecipeFilter, RecipeIngredientView, RecipeView};
pub use root::{Command, IngredientAmount, Limits, RecipeInput};
pub use tag::{Tag, TagInput, Tags};
