use auth::Role;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;

/// Echo the verified identity from the request context.
pub async fn me(user: CurrentUser) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&CurrentUser> for MeResponseData {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.user_id.to_string(),
            username: user.username.clone(),
            role: user.role,
            issued_at: DateTime::from_timestamp(user.claims.iat, 0),
            expires_at: user.claims.expires_at(),
        }
    }
}
