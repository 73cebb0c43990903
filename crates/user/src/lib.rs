mod query;
mod register;
mod repository;
mod subscription;

use std::ops::Deref;

pub use query::UserView;
pub use register::RegisterInput;
pub use repository::User;
pub use subscription::{RecipeSummary, SubscribedAuthor, Subscriptions};

#[derive(Clone)]
pub struct Command(pub recipebox_shared::State);

impl Deref for Command {
    type Target = recipebox_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: recipebox_shared::State) -> Self {
        Self(state)
    }

    pub async fn find(&self, id: impl Into<String>) -> recipebox_shared::Result<Option<User>> {
        repository::find(&self.read_db, repository::FindType::Id(id.into())).await
    }

    pub fn subscriptions(&self) -> Subscriptions {
        Subscriptions(self.0.clone())
    }
}
