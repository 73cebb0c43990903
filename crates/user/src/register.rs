use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::repository::{self, FindType, User};

static RE_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(
        length(min = 1, max = 150),
        regex(
            path = *RE_USERNAME,
            message = "Only letters, digits and @/./+/-/_ are allowed."
        )
    )]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> recipebox_shared::Result<User> {
        input.validate()?;

        if repository::find(&self.read_db, FindType::Email(input.email.to_owned()))
            .await?
            .is_some()
        {
            recipebox_shared::bail!("A user with that email already exists");
        }

        if repository::find(&self.read_db, FindType::Username(input.username.to_owned()))
            .await?
            .is_some()
        {
            recipebox_shared::bail!("A user with that username already exists");
        }

        let user = User {
            id: ulid::Ulid::new().to_string(),
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
        };

        repository::create(&self.write_db, &user).await?;

        tracing::info!(user.id = %user.id, "user registered");

        Ok(user)
    }
}
