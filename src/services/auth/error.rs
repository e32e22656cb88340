//! Failure taxonomy for bearer-token authorization.
//!
//! `Display` carries operator-facing detail (for log lines). Callers over HTTP only
//! ever see `public_message()`.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("authorization header must be `Bearer <token>`")]
    MalformedHeader,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("no signing key for kid `{kid}`")]
    UnknownSigningKey { kid: String },

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("invalid claims: {0}")]
    InvalidClaims(#[from] ClaimsViolation),

    #[error("permission `{required}` denied: {denial}")]
    InsufficientScope {
        required: String,
        denial: ScopeDenial,
    },

    #[error("signing key fetch failed: {0}")]
    KeyFetch(#[from] KeyFetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsViolation {
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("audience mismatch")]
    InvalidAudience,
    #[error("issuer mismatch")]
    InvalidIssuer,
    #[error("missing required claim `{0}`")]
    MissingClaim(String),
    #[error("claim payload malformed: {0}")]
    Malformed(String),
}

/// Why a scope check failed. Both cases surface as `InsufficientScope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScopeDenial {
    #[error("token carries no `permissions` claim")]
    PermissionsClaimMissing,
    #[error("permission not granted")]
    NotGranted,
}

#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("jwks request timed out")]
    Timeout,
    #[error("jwks request failed: {0}")]
    Transport(String),
    #[error("jwks endpoint answered with status {0}")]
    Status(u16),
    #[error("jwks document rejected: {0}")]
    InvalidDocument(String),
    #[error("http client setup failed: {0}")]
    Client(String),
}

impl KeyFetchError {
    /// Failures worth one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::Status(status) => *status >= 500 || *status == 429,
            Self::InvalidDocument(_) | Self::Client(_) => false,
        }
    }
}

impl From<reqwest::Error> for KeyFetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidDocument(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl AuthFailure {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedHeader
            | Self::MalformedToken(_)
            | Self::UnknownSigningKey { .. }
            | Self::InvalidSignature
            | Self::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            Self::InsufficientScope { .. } => StatusCode::FORBIDDEN,
            Self::KeyFetch(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Generic description that is safe to hand back to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "authorization header is malformed",
            Self::MalformedToken(_) => "token is malformed",
            Self::UnknownSigningKey { .. } | Self::InvalidSignature => {
                "token could not be verified"
            }
            Self::InvalidClaims(_) => "token is not valid for this api",
            Self::InsufficientScope { .. } => "permission not granted",
            Self::KeyFetch(_) => "authorization is temporarily unavailable",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthFailure {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => ClaimsViolation::Expired.into(),
            ErrorKind::ImmatureSignature => ClaimsViolation::NotYetValid.into(),
            ErrorKind::InvalidAudience => ClaimsViolation::InvalidAudience.into(),
            ErrorKind::InvalidIssuer => ClaimsViolation::InvalidIssuer.into(),
            ErrorKind::MissingRequiredClaim(claim) => {
                ClaimsViolation::MissingClaim(claim.clone()).into()
            }
            ErrorKind::Json(err) => ClaimsViolation::Malformed(err.to_string()).into(),
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                Self::MalformedToken(e.to_string())
            }
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            // Key material the backend refused to verify with.
            _ => Self::InvalidSignature,
        }
    }
}
