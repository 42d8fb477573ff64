//! Error types for the Content Hub application

use thiserror::Error;

/// Reasons an identity token fails verification
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Not a decodable token (bad segments, bad encoding, bad claims)
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the server secret
    #[error("invalid token signature")]
    InvalidSignature,

    /// Past its expiry time
    #[error("token expired")]
    Expired,
}

/// Authentication and authorization failures.
///
/// The `Display` text of each variant is exactly what callers see, so
/// both login failure paths share one message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken(#[source] TokenError),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not authorized")]
    NotOwner,
}
