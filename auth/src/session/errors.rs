use thiserror::Error;

/// Why the gate refused a request.
///
/// The `Display` text is the exact message returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No token was presented.
    #[error("Unauthorized: No token provided")]
    Unauthenticated,

    /// Signature or format check failed.
    #[error("Unauthorized: Invalid token")]
    InvalidCredential,

    /// Correctly signed, but past its embedded expiry.
    #[error("Unauthorized: Token expired")]
    ExpiredCredential,
}

impl SessionError {
    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Unauthenticated => "unauthenticated",
            SessionError::InvalidCredential => "invalid",
            SessionError::ExpiredCredential => "expired",
        }
    }
}
