#![allow(dead_code)]

use axum::body::Body;
use axum::http::Response;
use rosterd::{
    ServerConfig, create_app,
    db::{Database, NewUser, User},
    jwt::{JwtConfig, RefreshClaims},
};

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-used-only-in-tests";
pub const TEST_DOMAIN: &str = "example.com";
pub const TEST_ORIGIN: &str = "http://localhost:8090";

/// Create a test app and return (app, db, jwt_config).
pub async fn create_test_app() -> (axum::Router, Database, JwtConfig) {
    create_test_app_with_domain(TEST_DOMAIN).await
}

/// Create a test app configured for a specific domain.
pub async fn create_test_app_with_domain(domain: &str) -> (axum::Router, Database, JwtConfig) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let jwt_config = JwtConfig::new(TEST_SECRET, domain);
    let config = ServerConfig {
        db: db.clone(),
        domain: domain.to_string(),
        allowed_origin: TEST_ORIGIN.to_string(),
        jwt_secret: TEST_SECRET.to_vec(),
    };
    (create_app(&config), db, jwt_config)
}

/// Insert a user with a bcrypt-hashed password and return the stored record.
/// Uses the minimum bcrypt cost to keep tests fast.
pub async fn seed_user(db: &Database, email: &str, password: &str, is_admin: bool) -> User {
    let hash = bcrypt::hash(password, 4).expect("Failed to hash test password");
    let id = db
        .users()
        .insert(&NewUser {
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: hash,
            is_admin,
        })
        .await
        .expect("Failed to seed user");
    db.users()
        .get(id)
        .await
        .expect("Failed to read seeded user")
        .expect("Seeded user missing")
}

/// Sign a refresh token with the test secret and an arbitrary expiration.
pub fn refresh_token_with_exp(sub: &str, exp: u64) -> String {
    let claims = RefreshClaims {
        sub: sub.to_string(),
        exp,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("Failed to sign test refresh token")
}

/// Extract Set-Cookie headers from a response.
pub fn extract_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// Find the refresh cookie among Set-Cookie headers, if any.
pub fn refresh_set_cookie(cookies: &[String]) -> Option<&String> {
    cookies
        .iter()
        .find(|c| c.starts_with("__Host-refresh_token="))
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}
