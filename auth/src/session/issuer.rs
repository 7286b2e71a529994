use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::role::Role;

/// Creates signed session tokens for already-authenticated users.
///
/// Passwords are never looked at here; callers verify credentials first.
pub struct SessionIssuer {
    jwt_handler: Arc<JwtHandler>,
    ttl: Duration,
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

impl IssuedSession {
    /// Transport lifetime matching the embedded expiry.
    pub fn max_age(&self) -> Duration {
        Duration::seconds(self.claims.lifetime_seconds())
    }
}

impl SessionIssuer {
    /// # Arguments
    /// * `jwt_handler` - Signer holding the server secret
    /// * `ttl` - Lifetime of every issued token
    pub fn new(jwt_handler: Arc<JwtHandler>, ttl: Duration) -> Self {
        Self { jwt_handler, ttl }
    }

    /// Issue a token valid from now until now + ttl.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue(
        &self,
        subject: &str,
        username: &str,
        role: Role,
    ) -> Result<IssuedSession, JwtError> {
        self.issue_at(subject, username, role, Utc::now())
    }

    /// Issue a token as if the current instant were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        username: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, JwtError> {
        let claims = SessionClaims::new(subject, username, role, now, self.ttl);
        let token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedSession { token, claims })
    }
}
