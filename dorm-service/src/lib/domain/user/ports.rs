use async_trait::async_trait;
use auth::Role;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;
use crate::user::models::Username;

/// Port for account operations used by the HTTP layer.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create a new account, hashing its password.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHashing` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Look up the credential record a login form refers to.
    ///
    /// # Errors
    /// * `NotFoundByIdentifier` - No account with this username or email
    /// * `DatabaseError` - Database operation failed
    async fn find_by_identifier(&self, identifier: &LoginIdentifier) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// Create the given administrator unless an admin account already exists.
    ///
    /// # Returns
    /// The created account, or `None` when an admin was already present
    async fn ensure_admin(&self, command: CreateUserCommand) -> Result<Option<User>, UserError>;
}

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    async fn count_by_role(&self, role: Role) -> Result<i64, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
