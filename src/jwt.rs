//! JWT token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::User;

/// Access token duration: 15 minutes
pub const ACCESS_TOKEN_DURATION_SECS: u64 = 15 * 60;

/// Refresh token duration: 24 hours
pub const REFRESH_TOKEN_DURATION_SECS: u64 = 24 * 60 * 60;

/// Claims carried by access tokens.
///
/// Issuer and audience are both pinned to the service domain; a token
/// minted for a different domain fails validation regardless of its
/// signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id in string form)
    pub sub: String,
    /// Display name ("first last")
    pub name: String,
    /// Issuer (service domain)
    pub iss: String,
    /// Audience (service domain)
    pub aud: String,
    /// Administrative flag
    pub admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Claims carried by refresh tokens: subject and expiration only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user id in string form)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// An access/refresh token pair, independently signed with the same secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    domain: String,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and service domain.
    pub fn new(secret: &[u8], domain: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            domain: domain.to_string(),
        }
    }

    /// The configured service domain (issuer and audience of access tokens).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Generate an access/refresh token pair for a user.
    ///
    /// The pair shares nothing but the subject: the access token carries the
    /// full claim set, the refresh token only subject and expiration. Neither
    /// is stored server-side.
    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair, JwtError> {
        let now = unix_now()?;

        let access_claims = AccessClaims {
            sub: user.id.to_string(),
            name: format!("{} {}", user.first_name, user.last_name),
            iss: self.domain.clone(),
            aud: self.domain.clone(),
            admin: user.is_admin,
            exp: now + ACCESS_TOKEN_DURATION_SECS,
        };

        let access_token =
            jsonwebtoken::encode(&Header::default(), &access_claims, &self.encoding_key)
                .map_err(JwtError::Encoding)?;

        let refresh_claims = RefreshClaims {
            sub: user.id.to_string(),
            exp: now + REFRESH_TOKEN_DURATION_SECS,
        };

        let refresh_token =
            jsonwebtoken::encode(&Header::default(), &refresh_claims, &self.encoding_key)
                .map_err(JwtError::Encoding)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate and decode an access token.
    ///
    /// Only HS256 is accepted; a token whose header asserts any other
    /// algorithm is rejected before its claims are trusted. The issuer check
    /// runs after signature validation so a token signed with our secret for
    /// another domain still fails.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        let token_data =
            jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(
                |e| {
                    if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                        JwtError::Expired
                    } else {
                        JwtError::Decoding(e)
                    }
                },
            )?;

        if token_data.claims.iss != self.domain {
            return Err(JwtError::IssuerMismatch);
        }

        Ok(token_data.claims)
    }

    /// Validate and decode a refresh token.
    ///
    /// Refresh tokens carry no issuer or audience, so only signature and
    /// expiration are checked.
    pub fn parse_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        let token_data =
            jsonwebtoken::decode::<RefreshClaims>(token, &self.decoding_key, &validation).map_err(
                |e| {
                    if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                        JwtError::Expired
                    } else {
                        JwtError::Decoding(e)
                    }
                },
            )?;

        Ok(token_data.claims)
    }
}

/// Current Unix time in seconds.
pub fn unix_now() -> Result<u64, JwtError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::TimeError)?
        .as_secs())
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding the token
    Decoding(jsonwebtoken::errors::Error),
    /// Token expiration has passed
    Expired,
    /// Token issuer does not match the configured domain
    IssuerMismatch,
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::Expired => write!(f, "Token is expired"),
            JwtError::IssuerMismatch => write!(f, "Incorrect issuer"),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 1,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: "admin@example.com".to_string(),
            password: String::new(),
            is_admin: true,
        }
    }

    #[test]
    fn test_generate_and_validate_pair() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", "example.com");

        let pair = config.generate_token_pair(&test_user()).unwrap();

        let claims = config.validate_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.name, "Admin User");
        assert_eq!(claims.iss, "example.com");
        assert_eq!(claims.aud, "example.com");
        assert!(claims.admin);

        let refresh = config.parse_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, "1");
        assert!(refresh.exp > claims.exp);
    }

    #[test]
    fn test_non_admin_flag() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", "example.com");
        let user = User {
            is_admin: false,
            ..test_user()
        };

        let pair = config.generate_token_pair(&user).unwrap();
        let claims = config.validate_access_token(&pair.access_token).unwrap();
        assert!(!claims.admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config1 = JwtConfig::new(b"secret-1", "example.com");
        let config2 = JwtConfig::new(b"secret-2", "example.com");

        let pair = config1.generate_token_pair(&test_user()).unwrap();

        assert!(config2.validate_access_token(&pair.access_token).is_err());
        assert!(config2.parse_refresh_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        // Same secret, different configured domain: signature is valid but
        // the issuer check must still fail.
        let issuing = JwtConfig::new(b"shared-secret", "example.com");
        let verifying = JwtConfig::new(b"shared-secret", "anotherdomain.com");

        let pair = issuing.generate_token_pair(&test_user()).unwrap();

        let err = verifying
            .validate_access_token(&pair.access_token)
            .unwrap_err();
        assert!(matches!(err, JwtError::IssuerMismatch));
    }

    #[test]
    fn test_expired_token_distinguished() {
        let secret = b"test-secret";
        let encoding_key = EncodingKey::from_secret(secret);
        let now = unix_now().unwrap();

        let claims = AccessClaims {
            sub: "1".to_string(),
            name: "Admin User".to_string(),
            iss: "example.com".to_string(),
            aud: "example.com".to_string(),
            admin: false,
            exp: now - 50,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &encoding_key).unwrap();

        let config = JwtConfig::new(secret, "example.com");
        let err = config.validate_access_token(&token).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_refresh_token_rejected_as_access_token() {
        // Refresh tokens lack name/iss/aud/admin claims, so they cannot pass
        // access-token validation.
        let config = JwtConfig::new(b"test-secret-key-for-testing", "example.com");

        let pair = config.generate_token_pair(&test_user()).unwrap();
        assert!(config.validate_access_token(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", "example.com");

        assert!(config.validate_access_token("not-a-token").is_err());
        assert!(config.parse_refresh_token("not-a-token").is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", "example.com");

        let pair = config.generate_token_pair(&test_user()).unwrap();
        let tampered = format!("{}x", pair.access_token);
        assert!(config.validate_access_token(&tampered).is_err());
    }
}
