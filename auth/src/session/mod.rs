pub mod errors;
pub mod issuer;
pub mod verifier;

pub use errors::SessionError;
pub use issuer::IssuedSession;
pub use issuer::SessionIssuer;
pub use verifier::SessionVerifier;
