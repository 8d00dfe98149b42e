//! Auth gate middleware for protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::bearer::token_from_header;
use crate::jwt::JwtConfig;

/// Require a valid bearer access token before invoking the wrapped handler.
///
/// On success the validated claims are inserted into request extensions so
/// downstream handlers can read the caller's identity without re-verifying.
/// On failure the request is short-circuited with a generic 401. Either way
/// the response is marked as varying by the Authorization header.
pub async fn require_auth(
    State(jwt): State<Arc<JwtConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut response = match token_from_header(request.headers(), &jwt) {
        Ok((_token, claims)) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    };

    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));

    response
}
