//! User registration and username-based login.

use crate::entities::{NewUser, User};
use crate::error::{CoreError, CoreResult};
use crate::lifecycle::ForumService;
use crate::store::StoreError;
use crate::types::DbId;
use crate::validation::{validate_bio, validate_username};

impl ForumService {
    /// Register a new user. A taken username is a `Conflict`.
    pub async fn register_user(&self, input: &NewUser) -> CoreResult<User> {
        let username = input.username.trim();
        let bio = input.bio.as_deref().map(str::trim).unwrap_or_default();
        validate_username(username).map_err(CoreError::Validation)?;
        validate_bio(bio).map_err(CoreError::Validation)?;

        let user = self
            .store()
            .create_user(username, bio)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    CoreError::Conflict(format!("Username '{username}' is already taken"))
                }
                other => CoreError::Storage(other),
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Resolve a username to a user, creating the user on first login.
    pub async fn login(&self, username: &str) -> CoreResult<User> {
        let username = username.trim();
        validate_username(username).map_err(CoreError::Validation)?;

        if let Some(user) = self.store().find_user_by_username(username).await? {
            return Ok(user);
        }

        match self.store().create_user(username, "").await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "User created on first login");
                Ok(user)
            }
            // Lost a race with a concurrent first login: use the winner's row.
            Err(StoreError::Conflict(_)) => self
                .store()
                .find_user_by_username(username)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal(format!(
                        "User '{username}' conflicted on insert but could not be read back"
                    ))
                }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user(&self, id: DbId) -> CoreResult<User> {
        self.store()
            .find_user(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "User", id })
    }
}
