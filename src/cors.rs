//! Cross-origin policy for credentialed browser clients.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "Accept, Content-Type, X-CSRF-Token, Authorization";

/// The single origin allowed to make credentialed cross-origin calls.
#[derive(Clone)]
pub struct CorsConfig {
    allowed_origin: HeaderValue,
}

impl CorsConfig {
    /// Build the policy for one allowed origin.
    /// Fails if the origin is not a valid header value.
    pub fn new(allowed_origin: &str) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        Ok(Self {
            allowed_origin: HeaderValue::from_str(allowed_origin)?,
        })
    }
}

/// Announce the allowed origin on every response. Preflight requests are
/// additionally granted credentials, methods, and headers, and are answered
/// here without reaching any downstream handler.
pub async fn cors(State(config): State<CorsConfig>, request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            config.allowed_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        return response;
    }

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        config.allowed_origin.clone(),
    );
    response
}
