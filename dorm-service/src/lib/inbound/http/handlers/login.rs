use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Verify credentials, set the session cookie, and tell the client where to land.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let identifier =
        LoginIdentifier::parse(body.identifier).map_err(|_| ApiError::invalid_credentials())?;

    let user = match state.user_service.find_by_identifier(&identifier).await {
        Ok(user) => user,
        Err(UserError::NotFoundByIdentifier(_)) => {
            tracing::info!(identifier = %identifier, "Login refused: unknown account");
            let authenticator = Arc::clone(&state.authenticator);
            return Err(reject_unknown_account(authenticator, body.password).await);
        }
        Err(e) => return Err(ApiError::from(e)),
    };

    let authenticator = Arc::clone(&state.authenticator);
    let password = body.password;
    let stored_hash = user.password_hash.clone();
    let subject = user.id.to_string();
    let username = user.username.to_string();
    let role = user.role;

    let session = tokio::task::spawn_blocking(move || {
        authenticator.authenticate(&password, &stored_hash, &subject, &username, role)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("Authentication task failed: {}", e)))?
    .map_err(|e| match e {
        AuthenticationError::InvalidCredentials => {
            tracing::info!(user_id = %user.id, "Login refused: wrong password");
            ApiError::invalid_credentials()
        }
        AuthenticationError::PasswordError(err) => {
            ApiError::InternalServerError(format!("Password verification failed: {}", err))
        }
        AuthenticationError::JwtError(err) => {
            ApiError::InternalServerError(format!("Token generation failed: {}", err))
        }
    })?;

    tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");

    let jar = jar.add(state.cookie_policy.session_cookie(&session));
    let data = LoginResponseData {
        user: (&user).into(),
        redirect: landing_page(user.role).to_string(),
        expires_at: session.claims.expires_at().unwrap_or_else(Utc::now),
    };

    Ok((jar, ApiSuccess::new(StatusCode::OK, data)))
}

/// Spend the same hashing effort as a real check, then refuse.
async fn reject_unknown_account(authenticator: Arc<Authenticator>, password: String) -> ApiError {
    if let Err(e) =
        tokio::task::spawn_blocking(move || authenticator.reject_unknown(&password)).await
    {
        tracing::warn!(error = %e, "Dummy password check task failed");
    }

    ApiError::invalid_credentials()
}

/// Where the portal sends each role after login.
fn landing_page(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::Tenant => "/tenant",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    /// Username or email address
    identifier: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: LoginUserData,
    pub redirect: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginUserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for LoginUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}
