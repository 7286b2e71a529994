use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash is not a PHC string Argon2 understands.
    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}
