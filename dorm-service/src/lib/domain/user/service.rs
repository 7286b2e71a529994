use std::sync::Arc;

use async_trait::async_trait;
use auth::Role;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Argon2 is CPU-bound, so it runs off the async worker threads.
    async fn hash_password(&self, password: &NewPassword) -> Result<String, UserError> {
        let hasher = self.password_hasher;
        let password = password.expose().to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(&command.password).await?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: command.role,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            role = %created_user.role,
            "Account created"
        );

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn find_by_identifier(&self, identifier: &LoginIdentifier) -> Result<User, UserError> {
        let user = match identifier {
            LoginIdentifier::Username(username) => {
                self.repository.find_by_username(username).await?
            }
            LoginIdentifier::Email(email) => self.repository.find_by_email(email).await?,
        };

        user.ok_or_else(|| UserError::NotFoundByIdentifier(identifier.to_string()))
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "Account deleted");
        Ok(())
    }

    async fn ensure_admin(
        &self,
        mut command: CreateUserCommand,
    ) -> Result<Option<User>, UserError> {
        let admins = self.repository.count_by_role(Role::Admin).await?;
        if admins > 0 {
            tracing::debug!(admins, "Admin account present, skipping bootstrap");
            return Ok(None);
        }

        command.role = Role::Admin;
        self.create_user(command).await.map(Some)
    }
}
