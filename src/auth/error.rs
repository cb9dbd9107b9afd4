//! Authorization rejection types.
//!
//! Every rejection renders as `{"detail": <message>}` with status 401.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Reasons a request or connection is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// Master token header missing or not equal to the configured secret
    UnauthorizedMaster,
    /// Access token header missing
    MissingAccessToken,
    /// Access token undecodable, expired, or without a client id
    InvalidAccessToken,
    /// Access token of the wrong kind (strict token type mode only)
    WrongTokenType,
    /// No canonical token stored for the client
    InvalidClientId,
    /// Canonical token differs from the presented one
    UnauthorizedAccessToken,
}

impl AuthErrorCode {
    /// Get error name string.
    pub fn name(self) -> &'static str {
        match self {
            Self::UnauthorizedMaster => "UNAUTHORIZED_MASTER_TOKEN",
            Self::MissingAccessToken => "MISSING_ACCESS_TOKEN",
            Self::InvalidAccessToken => "INVALID_ACCESS_TOKEN",
            Self::WrongTokenType => "WRONG_TOKEN_TYPE",
            Self::InvalidClientId => "INVALID_CLIENT_ID",
            Self::UnauthorizedAccessToken => "UNAUTHORIZED_ACCESS_TOKEN",
        }
    }

    /// Default `detail` text.
    pub fn detail(self) -> &'static str {
        match self {
            Self::UnauthorizedMaster => "Unauthorized Master Token",
            Self::MissingAccessToken => "Invalid Access Token. Access Token is null",
            Self::InvalidAccessToken => "Invalid Access Token",
            Self::WrongTokenType => "Invalid Access Token. Wrong token type",
            Self::InvalidClientId => "Invalid Client ID",
            Self::UnauthorizedAccessToken => "Unauthorized Access Token",
        }
    }

    /// Get HTTP status code.
    pub fn http_status(self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

/// Authorization rejection with its client-facing detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create error with default message.
    pub fn from_code(code: AuthErrorCode) -> Self {
        Self::new(code, code.detail())
    }

    /// Default message followed by the underlying cause.
    pub fn with_cause(code: AuthErrorCode, cause: impl std::fmt::Display) -> Self {
        Self::new(code, format!("{}. Error: {}", code.detail(), cause))
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.name(), self.message)
    }
}

impl std::error::Error for AuthError {}

/// JSON response body for auth errors.
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub detail: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            detail: self.message,
        };
        (self.code.http_status(), Json(body)).into_response()
    }
}
