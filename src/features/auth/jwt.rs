//! JWT access-token generation/validation and refresh-token helpers.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload.
//! Refresh tokens are opaque random strings; only their SHA-256 hash is
//! stored server-side so a database leak does not compromise active sessions.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::config::JwtConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::models::AuthenticatedUser;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: i32,
    /// The username at the time of issuance.
    pub username: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for revocation / audit.
    pub jti: String,
}

/// Issues and validates locally signed tokens.
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Generate an HS256 access token for the given user.
    ///
    /// Returns the token together with its lifetime in seconds.
    pub fn generate_access_token(&self, user_id: i32, username: &str) -> Result<(String, i64)> {
        let now = Utc::now().timestamp();
        let expires_in = self.config.access_token_expiry_mins * 60;

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: now + expires_in,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Validate and decode an access token, returning the embedded [`Claims`].
    ///
    /// Validates the signature, expiration, and issued-at claims automatically.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &Validation::new(Algorithm::HS256), // validates signature and exp
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
        Ok(token_data.claims)
    }

    /// Validate a bearer token and convert its claims into the request-scoped
    /// [`AuthenticatedUser`] identity.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.validate_token(token)?;
        Ok(AuthenticatedUser {
            id: claims.sub,
            username: claims.username,
        })
    }

    /// Generate a cryptographically random refresh token.
    ///
    /// Returns a tuple of `(plaintext_token, sha256_hex_hash)`. The plaintext
    /// is sent to the client; only the hash is persisted server-side.
    pub fn generate_refresh_token(&self) -> (String, String) {
        let plaintext = Uuid::new_v4().to_string();
        let hash = Self::hash_refresh_token(&plaintext);
        (plaintext, hash)
    }

    /// Compute the SHA-256 hex digest of a refresh token.
    ///
    /// Use this to compare an incoming refresh token against the stored hash.
    pub fn hash_refresh_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Expiry timestamp for a refresh token issued now.
    pub fn refresh_token_expiry(&self) -> DateTime<Utc> {
        Utc::now() + Duration::days(self.config.refresh_token_expiry_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a test service with a known secret.
    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        })
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = test_service();
        let (token, expires_in) = service
            .generate_access_token(42, "alice")
            .expect("token generation should succeed");
        assert_eq!(expires_in, 15 * 60);

        let claims = service
            .validate_token(&token)
            .expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_authenticate_produces_request_identity() {
        let service = test_service();
        let (token, _) = service
            .generate_access_token(7, "bob")
            .expect("token generation should succeed");

        let user = service.authenticate(&token).expect("should authenticate");
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "bob");
    }

    #[test]
    fn test_expired_token_fails() {
        let service = test_service();

        // Manually create an already-expired token.
        // Use a margin well beyond the default 60-second leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "carol".to_string(),
            exp: now - 300, // expired 5 minutes ago (well past leeway)
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret-that-is-long-enough-for-hmac".as_bytes()),
        )
        .expect("encoding should succeed");

        let result = service.validate_token(&token);
        assert!(result.is_err(), "expired token must fail validation");
    }

    #[test]
    fn test_different_secrets_fail() {
        let service_a = test_service();
        let service_b = JwtService::new(JwtConfig {
            secret: "a-completely-different-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        });

        let (token, _) = service_a
            .generate_access_token(1, "dave")
            .expect("token generation should succeed");

        let result = service_b.validate_token(&token);
        assert!(
            result.is_err(),
            "token signed with a different secret must fail"
        );
    }

    #[test]
    fn test_refresh_token_hash_matches() {
        let service = test_service();
        let (plaintext, hash) = service.generate_refresh_token();

        // Re-hashing the same plaintext must produce the same digest.
        let rehashed = JwtService::hash_refresh_token(&plaintext);
        assert_eq!(hash, rehashed, "hash of the same token must be stable");

        // Sanity: the hash should be a 64-char hex string (SHA-256).
        assert_eq!(hash.len(), 64);
    }
}
