//! Bearer-credential verification against the Authorization header.

use axum::http::{HeaderMap, header};

use super::errors::AuthError;
use crate::jwt::{AccessClaims, JwtConfig};

/// Extract and validate the access token from an Authorization header.
///
/// The header must consist of exactly the literal `Bearer` scheme and one
/// token. On success returns the raw token string alongside the validated
/// claims. Responses on routes using this must vary by the Authorization
/// header; the auth gate middleware takes care of that.
pub fn token_from_header(
    headers: &HeaderMap,
    jwt: &JwtConfig,
) -> Result<(String, AccessClaims), AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = auth_header.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(AuthError::MalformedHeader);
    }

    if parts[0] != "Bearer" {
        return Err(AuthError::InvalidScheme);
    }

    let token = parts[1];
    let claims = jwt.validate_access_token(token)?;

    Ok((token.to_string(), claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::User;
    use axum::http::HeaderValue;

    fn jwt() -> JwtConfig {
        JwtConfig::new(b"test-secret-key-for-testing", "example.com")
    }

    fn bearer_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn access_token(jwt: &JwtConfig) -> String {
        let user = User {
            id: 1,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: "admin@example.com".to_string(),
            password: String::new(),
            is_admin: false,
        };
        jwt.generate_token_pair(&user).unwrap().access_token
    }

    #[test]
    fn test_valid_bearer_token() {
        let jwt = jwt();
        let token = access_token(&jwt);

        let (raw, claims) =
            token_from_header(&bearer_headers(&format!("Bearer {}", token)), &jwt).unwrap();
        assert_eq!(raw, token);
        assert_eq!(claims.sub, "1");
    }

    #[test]
    fn test_missing_header() {
        let err = token_from_header(&HeaderMap::new(), &jwt()).unwrap_err();
        assert!(matches!(err, AuthError::MissingHeader));
    }

    #[test]
    fn test_three_part_header() {
        let jwt = jwt();
        let token = access_token(&jwt);

        let err = token_from_header(&bearer_headers(&format!("Bearer {} world", token)), &jwt)
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedHeader));
    }

    #[test]
    fn test_one_part_header() {
        let err = token_from_header(&bearer_headers("Bearer"), &jwt()).unwrap_err();
        assert!(matches!(err, AuthError::MalformedHeader));
    }

    #[test]
    fn test_wrong_scheme() {
        let jwt = jwt();
        let token = access_token(&jwt);

        let err =
            token_from_header(&bearer_headers(&format!("Bear {}", token)), &jwt).unwrap_err();
        assert!(matches!(err, AuthError::InvalidScheme));
    }

    #[test]
    fn test_tampered_token() {
        let jwt = jwt();
        let token = access_token(&jwt);

        let err = token_from_header(&bearer_headers(&format!("Bearer {}1", token)), &jwt)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
