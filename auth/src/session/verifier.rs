use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use super::errors::SessionError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;

/// The check behind the auth gate: is this a currently valid, unforged session?
///
/// Stateless and CPU-only. Role checks are not performed here.
pub struct SessionVerifier {
    jwt_handler: Arc<JwtHandler>,
}

impl SessionVerifier {
    pub fn new(jwt_handler: Arc<JwtHandler>) -> Self {
        Self { jwt_handler }
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: Option<&str>) -> Result<SessionClaims, SessionError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// A missing or empty token is rejected before any decoding happens.
    /// The signature is checked before expiry, so an expired verdict always
    /// refers to a token this server really issued.
    ///
    /// # Errors
    /// * `Unauthenticated` - No token presented
    /// * `InvalidCredential` - Forged, tampered, or malformed token
    /// * `ExpiredCredential` - Genuine token at or past its expiry
    pub fn verify_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, SessionError> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(SessionError::Unauthenticated),
        };

        let claims: SessionClaims = self
            .jwt_handler
            .decode(token)
            .map_err(|_| SessionError::InvalidCredential)?;

        if claims.is_expired_at(now) {
            return Err(SessionError::ExpiredCredential);
        }

        Ok(claims)
    }
}
