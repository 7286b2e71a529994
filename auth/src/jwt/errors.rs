use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Bad signature, wrong algorithm, malformed segments or an undecodable payload.
    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
