//! Authorization error types.
//!
//! Every failure on the verify-and-check path is reported as a single [`AuthError`]
//! carrying a short machine-readable code, a human readable description and the HTTP
//! status the boundary should answer with.

use std::fmt;
use thiserror::Error;

/// Short failure codes reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// The `Authorization` header is missing or is not a `Bearer <token>` pair
    MissingOrMalformedHeader,
    /// The token cannot be parsed, has no usable key or failed signature checks
    InvalidHeader,
    /// The token signature is valid but its `exp` is in the past
    TokenExpired,
    /// Audience/issuer mismatch, or the token carries no `permissions` claim
    InvalidClaims,
    /// The token does not grant the requested permission
    Unauthorized,
    /// The trusted key set could not be obtained
    KeySetUnavailable,
}

impl AuthErrorKind {
    /// Machine-readable code used in error responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingOrMalformedHeader => "missing_or_malformed_header",
            Self::InvalidHeader => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::Unauthorized => "unauthorized",
            Self::KeySetUnavailable => "key_set_unavailable",
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {description}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub description: String,
    /// HTTP status code as a plain integer so this crate stays transport agnostic
    pub status: u16,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, description: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            description: description.into(),
            status,
        }
    }

    pub fn missing_or_malformed_header(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::MissingOrMalformedHeader, description, 401)
    }

    pub fn invalid_header(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidHeader, description, 401)
    }

    pub fn token_expired() -> Self {
        Self::new(AuthErrorKind::TokenExpired, "Token expired.", 401)
    }

    /// Audience or issuer rejected while verifying the token
    pub fn invalid_claims() -> Self {
        Self::new(
            AuthErrorKind::InvalidClaims,
            "Incorrect claims. Please, check the audience and issuer.",
            401,
        )
    }

    /// A verified token that has no `permissions` claim at all
    pub fn permissions_missing() -> Self {
        Self::new(
            AuthErrorKind::InvalidClaims,
            "Permissions not included in JWT.",
            400,
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(AuthErrorKind::Unauthorized, "Permission not found.", 403)
    }

    pub fn key_set_unavailable(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::KeySetUnavailable, description, 503)
    }

    /// Short code, e.g. `token_expired`
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::token_expired(),
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::MissingRequiredClaim(_) => AuthError::invalid_claims(),
            _ => AuthError::invalid_header("Unable to parse authentication token."),
        }
    }
}
