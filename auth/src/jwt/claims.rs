use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::role::Role;

/// Payload of a session token.
///
/// Every field is covered by the signature, including the absolute expiry,
/// so a token can never outlive `exp` whatever the cookie lifetime says.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Login name, echoed back to handlers for display
    pub username: String,

    pub role: Role,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,
}

impl SessionClaims {
    /// Build claims for a user, expiring `ttl` after `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `username` - Username stored alongside the subject
    /// * `role` - Role granted for the lifetime of the token
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Token lifetime
    pub fn new(
        subject: impl ToString,
        username: impl ToString,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            sub: subject.to_string(),
            username: username.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// A token is valid strictly before `exp`; at `exp` it is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Seconds between issuance and expiry.
    pub fn lifetime_seconds(&self) -> i64 {
        self.exp - self.iat
    }
}
