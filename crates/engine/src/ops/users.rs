use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a user. There is no public signup, so this is only reached
    /// from the admin tooling.
    pub async fn create_user(
        &self,
        username: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> ResultEngine<()> {
        let username = normalize_required_name(username, "username")?;
        let name = normalize_required_name(name, "name")?;
        let email = email.trim().to_string();
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(password.to_string()),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!("created user {username}");
            Ok(())
        })
    }
}
