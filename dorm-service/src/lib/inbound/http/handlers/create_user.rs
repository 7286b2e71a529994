use auth::Role;
use auth::RoleParseError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewPassword;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AdminUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UsernameError;

/// Provision a tenant or admin account. Admin only.
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<CreateUserResponseData>, ApiError> {
    let command = body.try_into_command()?;

    let user = state
        .user_service
        .create_user(command)
        .await
        .map_err(ApiError::from)?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        created_by = %admin.user_id,
        "Account provisioned"
    );

    Ok(ApiSuccess::new(StatusCode::CREATED, (&user).into()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    username: String,
    email_address: String,
    password: String,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleParseError),
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        let username = Username::new(self.username)?;
        let email_address = EmailAddress::new(self.email_address)?;
        let password = NewPassword::new(self.password)?;
        let role = match self.role {
            Some(raw) => raw.parse::<Role>()?,
            None => Role::Tenant,
        };
        Ok(CreateUserCommand::new(
            username,
            email_address,
            password,
            role,
        ))
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for CreateUserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: Option<&str>) -> CreateUserRequest {
        CreateUserRequest {
            username: "room_12b".to_string(),
            email_address: "Room12B@Dorm.Local".to_string(),
            password: "correct horse battery".to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_role_defaults_to_tenant() {
        let command = request(None).try_into_command().unwrap();
        assert_eq!(command.role, Role::Tenant);
        assert_eq!(command.email.as_str(), "room12b@dorm.local");
    }

    #[test]
    fn test_explicit_admin_role() {
        let command = request(Some("admin")).try_into_command().unwrap();
        assert_eq!(command.role, Role::Admin);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = request(Some("superuser")).try_into_command();
        assert!(matches!(result, Err(ParseCreateUserRequestError::Role(_))));
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut body = request(None);
        body.password = "short".to_string();
        assert!(matches!(
            body.try_into_command(),
            Err(ParseCreateUserRequestError::Password(_))
        ));
    }
}
