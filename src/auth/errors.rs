//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::jwt::JwtError;

/// Why a bearer credential was rejected.
///
/// The distinctions exist for logging and for callers that special-case
/// expiry; clients always receive the same generic 401 so the response
/// leaks nothing about which check failed.
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header present
    MissingHeader,
    /// Header did not split into exactly two parts
    MalformedHeader,
    /// Scheme was not `Bearer`
    InvalidScheme,
    /// Token expiration has passed
    Expired,
    /// Token issuer does not match the configured domain
    IssuerMismatch,
    /// Bad signature, wrong algorithm, or unparsable token
    InvalidToken,
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::Expired,
            JwtError::IssuerMismatch => AuthError::IssuerMismatch,
            _ => AuthError::InvalidToken,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "missing Authorization header"),
            AuthError::MalformedHeader => write!(f, "invalid Authorization header"),
            AuthError::InvalidScheme => write!(f, "no Bearer scheme"),
            AuthError::Expired => write!(f, "token is expired"),
            AuthError::IssuerMismatch => write!(f, "incorrect issuer"),
            AuthError::InvalidToken => write!(f, "invalid token"),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self, "Rejected bearer credential");

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized",
            }),
        )
            .into_response()
    }
}
