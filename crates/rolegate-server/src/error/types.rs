//! API error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error enum covering all error cases.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("Bad request: {0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("{0}")]
    InvalidCredentials(String),

    // 404 Not Found
    #[error("{0} not found")]
    NotFound(String),

    // 413 Payload Too Large
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    // 500 Internal Server Error
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // 502 Bad Gateway
    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    // 504 Gateway Timeout
    #[error("Upstream service timed out")]
    UpstreamTimeout,
}

impl ApiError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidCredentials(_) => "invalid_credentials",
            Self::NotFound(_) => "not_found",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::Internal(_) => "internal_error",
            Self::UpstreamError(_) => "upstream_error",
            Self::UpstreamTimeout => "upstream_timeout",
        }
    }

    /// Check if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidCredentials("Bad password".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::UpstreamError("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert!(ApiError::UpstreamTimeout.is_server_error());
        assert!(ApiError::NotFound("page".into()).is_client_error());
    }

    #[test]
    fn test_invalid_credentials_shows_upstream_message() {
        let err = ApiError::InvalidCredentials("Bad password".into());
        assert_eq!(err.to_string(), "Bad password");
        assert_eq!(err.error_code(), "invalid_credentials");
    }
}
