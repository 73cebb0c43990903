use crate::Result;

/// A unique (user, target) link that can be created and removed explicitly.
///
/// Favorites, shopping cart entries and author subscriptions all share this
/// shape. `add` fails when the link already exists and `remove` fails when it
/// does not.
#[async_trait::async_trait]
pub trait Relation: Send + Sync {
    async fn add(&self, user_id: &str, target_id: &str) -> Result<()>;

    async fn remove(&self, user_id: &str, target_id: &str) -> Result<()>;

    async fn contains(&self, user_id: &str, target_id: &str) -> Result<bool>;
}
