//! Access-control error taxonomy.

use crate::guard::AccessDecision;
use thiserror::Error;

/// Why a token could not be turned into claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("token has fewer than two segments")]
    MissingSegment,

    #[error("claims segment is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("claims segment is not valid UTF-8")]
    InvalidUtf8,

    #[error("claims segment is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("claims segment is not a JSON object")]
    NotAnObject,
}

/// Reasons the guard refuses a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("no session token present")]
    MissingToken,

    #[error("malformed token: {0}")]
    MalformedToken(#[from] DecodeError),

    #[error("token expired or carries no usable expiry")]
    ExpiredToken,

    #[error("none of the roles [{}] is accepted here", roles.join(", "))]
    InsufficientRole { roles: Vec<String> },
}

impl AccessError {
    /// Redirect this error resolves to.
    pub fn decision(&self) -> AccessDecision {
        match self {
            Self::MissingToken | Self::MalformedToken(_) | Self::ExpiredToken => {
                AccessDecision::RedirectHome
            }
            Self::InsufficientRole { .. } => AccessDecision::RedirectUnauthorized,
        }
    }

    /// Whether the stored session should be discarded.
    pub fn clears_session(&self) -> bool {
        matches!(self, Self::MalformedToken(_) | Self::ExpiredToken)
    }

    /// Stable code for logs and JSON bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::MalformedToken(_) => "malformed_token",
            Self::ExpiredToken => "expired_token",
            Self::InsufficientRole { .. } => "insufficient_role",
        }
    }
}
