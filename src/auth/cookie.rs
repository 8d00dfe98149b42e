//! Refresh-cookie parsing and construction.

use axum::http::header;

use crate::jwt::REFRESH_TOKEN_DURATION_SECS;

/// Cookie name for the refresh token. The `__Host-` prefix tells browsers
/// to only accept it when set Secure, from the root path.
pub const REFRESH_COOKIE_NAME: &str = "__Host-refresh_token";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Build the Set-Cookie value that stores a refresh token.
/// Lifetime matches the refresh token's own expiration.
pub fn refresh_cookie(token: &str, domain: &str) -> String {
    format!(
        "{}={}; Path=/; Domain={}; Max-Age={}; Secure; HttpOnly; SameSite=Strict",
        REFRESH_COOKIE_NAME, token, domain, REFRESH_TOKEN_DURATION_SECS
    )
}

/// Build the Set-Cookie value that clears the refresh cookie.
/// Expiry is set strictly in the past.
pub fn clear_refresh_cookie(domain: &str) -> String {
    format!(
        "{}=; Path=/; Domain={}; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Secure; HttpOnly; SameSite=Strict",
        REFRESH_COOKIE_NAME, domain
    )
}
