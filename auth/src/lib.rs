//! Session authentication for the dormitory portal.
//!
//! - Password hashing (Argon2id)
//! - Signed, time-bounded session tokens (HS256 JWT) carrying subject and role
//! - A verifier with a three-way rejection taxonomy: no token, invalid token, expired token
//!
//! Nothing here touches HTTP; the service crate decides how tokens travel.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Login and verification
//! ```
//! use auth::{Authenticator, Role, SessionError};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//!
//! let hash = auth.hash_password("password123").unwrap();
//! let session = auth
//!     .authenticate("password123", &hash, "user123", "alice", Role::Tenant)
//!     .unwrap();
//!
//! let claims = auth.verify_session(Some(&session.token)).unwrap();
//! assert_eq!(claims.role, Role::Tenant);
//!
//! assert_eq!(auth.verify_session(None), Err(SessionError::Unauthenticated));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod role;
pub mod session;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::Role;
pub use role::RoleParseError;
pub use session::IssuedSession;
pub use session::SessionError;
pub use session::SessionIssuer;
pub use session::SessionVerifier;
