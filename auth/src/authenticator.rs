use std::sync::Arc;

use chrono::Duration;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::role::Role;
use crate::session::IssuedSession;
use crate::session::SessionError;
use crate::session::SessionIssuer;
use crate::session::SessionVerifier;

/// Login and session facade built from one signing secret.
///
/// Issuer and verifier share the same [`JwtHandler`], so a token issued here
/// is accepted by [`Authenticator::verify_session`] until its expiry and by
/// no other deployment with a different secret.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    issuer: SessionIssuer,
    verifier: SessionVerifier,
}

/// Login failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// # Arguments
    /// * `secret` - Server-held signing secret
    /// * `session_ttl` - Lifetime of issued session tokens
    pub fn new(secret: &[u8], session_ttl: Duration) -> Self {
        let jwt_handler = Arc::new(JwtHandler::new(secret));

        Self {
            password_hasher: PasswordHasher::new(),
            issuer: SessionIssuer::new(Arc::clone(&jwt_handler), session_ttl),
            verifier: SessionVerifier::new(jwt_handler),
        }
    }

    pub fn issuer(&self) -> &SessionIssuer {
        &self.issuer
    }

    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a credential record and issue a session on match.
    ///
    /// # Arguments
    /// * `password` - Plaintext password from the login form
    /// * `stored_hash` - Hash from the credential record
    /// * `subject` - User identifier to embed
    /// * `username` - Username to embed
    /// * `role` - Role from the credential record
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `JwtError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        username: &str,
        role: Role,
    ) -> Result<IssuedSession, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issuer.issue(subject, username, role)?)
    }

    /// Reject a login whose identifier matched no account, after doing the
    /// same hashing work a real check would.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_dummy(password);
        AuthenticationError::InvalidCredentials
    }

    pub fn verify_session(&self, token: Option<&str>) -> Result<SessionClaims, SessionError> {
        self.verifier.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(b"test_secret_key_at_least_32_bytes!", Duration::hours(24))
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let session = authenticator
            .authenticate(password, &hash, "user123", "alice", Role::Admin)
            .expect("Authentication failed");

        let claims = authenticator
            .verify_session(Some(&session.token))
            .expect("Token validation failed");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(session.max_age(), Duration::hours(24));
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, "user123", "alice", Role::Tenant);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_with_corrupt_hash() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("pw", "not-a-phc-string", "user123", "alice", Role::Tenant);
        assert!(matches!(result, Err(AuthenticationError::PasswordError(_))));
    }

    #[test]
    fn test_reject_unknown_is_invalid_credentials() {
        let authenticator = authenticator();

        assert!(matches!(
            authenticator.reject_unknown("whatever"),
            AuthenticationError::InvalidCredentials
        ));
    }

    #[test]
    fn test_sessions_do_not_cross_deployments() {
        let ours = authenticator();
        let theirs = Authenticator::new(b"another_deployment_secret_32_bytes!", Duration::hours(24));

        let session = theirs.issuer().issue("user123", "alice", Role::Admin).unwrap();

        assert_eq!(
            ours.verify_session(Some(&session.token)),
            Err(SessionError::InvalidCredential)
        );
    }

    #[test]
    fn test_verify_session_without_token() {
        assert_eq!(
            authenticator().verify_session(None),
            Err(SessionError::Unauthenticated)
        );
    }
}
