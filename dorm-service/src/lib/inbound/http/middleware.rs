use std::sync::Arc;

use auth::Authenticator;
use auth::Role;
use auth::SessionClaims;
use auth::SessionError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::json;

use super::cookie::session_token;
use crate::domain::user::models::UserId;

/// Identity attached to a request once its session token has been verified.
///
/// Only the gate inserts this extension, so a handler holding one can trust it.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub claims: SessionClaims,
}

impl CurrentUser {
    fn from_claims(claims: SessionClaims) -> Result<Self, SessionError> {
        // Signed by us, so a bad subject means a bug or a leaked secret
        let user_id =
            UserId::from_string(&claims.sub).map_err(|_| SessionError::InvalidCredential)?;

        Ok(Self {
            user_id,
            username: claims.username.clone(),
            role: claims.role,
            claims,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// 401 response for a rejected session, body `{"message": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthorized(pub SessionError);

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": self.0.to_string() })),
        )
            .into_response()
    }
}

/// 403 response for an authenticated user lacking the required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forbidden;

impl IntoResponse for Forbidden {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Forbidden: Admin access required" })),
        )
            .into_response()
    }
}

/// Auth gate: verifies the `token` cookie and attaches [`CurrentUser`], or
/// ends the request with a 401.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, Unauthorized> {
    let user = authenticator
        .verify_session(session_token(&jar))
        .and_then(CurrentUser::from_claims)
        .map_err(|e| {
            tracing::warn!(
                reason = e.kind(),
                method = %req.method(),
                uri = %req.uri(),
                "Session rejected"
            );
            Unauthorized(e)
        })?;

    tracing::debug!(
        user_id = %user.user_id,
        role = %user.role,
        "Session accepted"
    );
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    /// Fails closed: a route mounted outside the gate sees no identity.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(Unauthorized(SessionError::Unauthenticated))
    }
}

/// A [`CurrentUser`] whose role is admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !user.is_admin() {
            tracing::warn!(user_id = %user.user_id, role = %user.role, "Admin route refused");
            return Err(Forbidden.into_response());
        }

        Ok(AdminUser(user))
    }
}
