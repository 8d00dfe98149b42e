//! Session API endpoints.
//!
//! - POST `/auth` - Issue a token pair from email/password credentials
//! - POST `/refresh-token` - Exchange a form-submitted refresh token near expiry
//! - GET `/web/refresh-token` - Exchange a cookie-held refresh token
//! - GET `/web/logout` - Clear the refresh cookie

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use super::error::{ApiError, ResultExt};
use crate::auth::{REFRESH_COOKIE_NAME, clear_refresh_cookie, get_cookie, refresh_cookie};
use crate::db::Database;
use crate::jwt::{JwtConfig, RefreshClaims, unix_now};

/// Form-submitted refresh tokens are only exchanged within this many seconds
/// of expiry. Rejecting earlier exchanges keeps a still-valid token from
/// being replayed into an indefinite chain of renewals.
pub const REFRESH_RENEWAL_WINDOW_SECS: u64 = 30;

#[derive(Clone)]
pub struct SessionsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
}

/// Routes mounted at the API root.
pub fn router(state: SessionsState) -> Router {
    Router::new()
        .route("/auth", post(authenticate))
        .route("/refresh-token", post(refresh))
        .with_state(state)
}

/// Cookie-aware routes for browser clients, mounted under `/web`.
pub fn web_router(state: SessionsState) -> Router {
    Router::new()
        .route("/auth", post(authenticate))
        .route("/refresh-token", get(refresh_via_cookie))
        .route("/logout", get(logout))
        .with_state(state)
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

/// Issue a token pair for valid email/password credentials.
///
/// Unknown email and wrong password produce the same generic 401 so the
/// endpoint cannot be used to probe which addresses exist.
async fn authenticate(
    State(state): State<SessionsState>,
    Json(creds): Json<Credentials>,
) -> Result<Response, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(&creds.email)
        .await
        .db_err("Failed to look up user by email")?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let password_ok = bcrypt::verify(&creds.password, &user.password).unwrap_or(false);
    if !password_ok {
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    let pair = state.jwt.generate_token_pair(&user).map_err(|e| {
        error!(error = %e, "Failed to sign token pair");
        ApiError::internal("Failed to generate tokens")
    })?;

    let cookie = refresh_cookie(&pair.refresh_token, state.jwt.domain());
    Ok((StatusCode::OK, [(SET_COOKIE, cookie)], Json(pair)).into_response())
}

/// Exchange a form-submitted refresh token for a new pair.
///
/// Unlike the cookie variant, this path enforces the renewal window: a
/// token with more than [`REFRESH_RENEWAL_WINDOW_SECS`] of life left is
/// rejected with 425 Too Early.
async fn refresh(
    State(state): State<SessionsState>,
    Form(req): Form<RefreshRequest>,
) -> Result<Response, ApiError> {
    let claims = state
        .jwt
        .parse_refresh_token(&req.refresh_token)
        .map_err(|_| ApiError::bad_request("Invalid refresh token"))?;

    let now = unix_now().map_err(|e| {
        error!(error = %e, "Clock error");
        ApiError::internal("System time error")
    })?;

    if claims.exp.saturating_sub(now) > REFRESH_RENEWAL_WINDOW_SECS {
        return Err(ApiError::too_early(
            "Refresh token does not need to be renewed yet",
        ));
    }

    exchange(&state, &claims).await
}

/// Exchange a cookie-held refresh token for a new pair.
///
/// No renewal window here: any still-valid cookie is exchanged
/// immediately, supporting silent renewal from the browser.
async fn refresh_via_cookie(
    State(state): State<SessionsState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let token = get_cookie(&headers, REFRESH_COOKIE_NAME)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let claims = state
        .jwt
        .parse_refresh_token(token)
        .map_err(|_| ApiError::bad_request("Invalid refresh token"))?;

    exchange(&state, &claims).await
}

/// Shared tail of both refresh variants: resolve the subject, mint a new
/// pair, rotate the refresh cookie.
async fn exchange(state: &SessionsState, claims: &RefreshClaims) -> Result<Response, ApiError> {
    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid subject claim"))?;

    let user = state
        .db
        .users()
        .get(user_id)
        .await
        .db_err("Failed to look up user")?
        .ok_or_else(|| ApiError::bad_request("Unknown user"))?;

    let pair = state.jwt.generate_token_pair(&user).map_err(|e| {
        error!(error = %e, "Failed to sign token pair");
        ApiError::internal("Failed to generate tokens")
    })?;

    let cookie = refresh_cookie(&pair.refresh_token, state.jwt.domain());
    Ok((StatusCode::OK, [(SET_COOKIE, cookie)], Json(pair)).into_response())
}

/// Clear the refresh cookie. Always succeeds; no token is verified.
async fn logout(State(state): State<SessionsState>) -> impl IntoResponse {
    let cookie = clear_refresh_cookie(state.jwt.domain());
    (StatusCode::ACCEPTED, [(SET_COOKIE, cookie)])
}
