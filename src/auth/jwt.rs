//! JWT token generation and validation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::accounts::AccountRole;

/// JWT claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account public identifier)
    pub sub: Uuid,
    /// Account role
    pub role: AccountRole,
    /// Token category (access or refresh)
    pub category: TokenCategory,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

impl Claims {
    pub fn is_access(&self) -> bool {
        self.category == TokenCategory::Access
    }

    pub fn is_refresh(&self) -> bool {
        self.category == TokenCategory::Refresh
    }
}

/// Claim distinguishing access from refresh tokens so one can never be
/// presented in place of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Access,
    Refresh,
}

/// JWT manager for token operations.
///
/// Holds the process-wide signing key; read-only after startup, so a single
/// instance is safely shared across concurrent validations.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_minutes: i64,
    refresh_ttl_days: i64,
}

impl JwtManager {
    /// Create a new JWT manager from the shared secret and configured TTLs
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_minutes,
            refresh_ttl_days,
        }
    }

    /// Issue a short-lived access token for an account
    pub fn issue_access_token(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<String, JwtError> {
        self.issue(
            account_id,
            role,
            TokenCategory::Access,
            Duration::minutes(self.access_ttl_minutes),
        )
    }

    /// Issue a longer-lived refresh token for an account
    pub fn issue_refresh_token(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<String, JwtError> {
        self.issue(
            account_id,
            role,
            TokenCategory::Refresh,
            Duration::days(self.refresh_ttl_days),
        )
    }

    fn issue(
        &self,
        account_id: Uuid,
        role: AccountRole,
        category: TokenCategory,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = OffsetDateTime::now_utc();

        let claims = Claims {
            sub: account_id,
            role,
            category,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        // Explicit algorithm prevents algorithm confusion attacks
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Validate signature, structure and expiry, returning the claims.
    /// Fails closed: any parse or signature defect is an error, never a panic.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60; // 60 second clock skew tolerance

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid,
            })
    }

    /// Validate an access token specifically; a refresh token presented here
    /// is rejected with `WrongCategory`.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if !claims.is_access() {
            return Err(JwtError::WrongCategory);
        }
        Ok(claims)
    }

    /// Validate a refresh token specifically
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if !claims.is_refresh() {
            return Err(JwtError::WrongCategory);
        }
        Ok(claims)
    }

    /// Access token lifetime in seconds, for `expires_in` response fields
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_ttl_minutes * 60
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("Wrong token category")]
    WrongCategory,
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-chars!!";

    fn manager() -> JwtManager {
        JwtManager::new(SECRET, 30, 14)
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let jwt = manager();
        let account_id = Uuid::new_v4();

        let token = jwt
            .issue_access_token(account_id, AccountRole::User)
            .expect("Failed to issue token");

        let claims = jwt.validate_access_token(&token).expect("Invalid token");
        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.role, AccountRole::User);
        assert_eq!(claims.category, TokenCategory::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_access_and_refresh_are_mutually_exclusive() {
        let jwt = manager();
        let account_id = Uuid::new_v4();

        let access = jwt
            .issue_access_token(account_id, AccountRole::Admin)
            .expect("Failed to issue token");
        let refresh = jwt
            .issue_refresh_token(account_id, AccountRole::Admin)
            .expect("Failed to issue token");

        let access_claims = jwt.validate_token(&access).expect("Invalid token");
        let refresh_claims = jwt.validate_token(&refresh).expect("Invalid token");
        assert!(access_claims.is_access() && !access_claims.is_refresh());
        assert!(refresh_claims.is_refresh() && !refresh_claims.is_access());

        // Using a refresh token as an access credential must fail
        assert!(matches!(
            jwt.validate_access_token(&refresh),
            Err(JwtError::WrongCategory)
        ));
        assert!(matches!(
            jwt.validate_refresh_token(&access),
            Err(JwtError::WrongCategory)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let jwt = manager();
        assert!(matches!(
            jwt.validate_token("not-a-token"),
            Err(JwtError::Invalid)
        ));
        assert!(matches!(jwt.validate_token(""), Err(JwtError::Invalid)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let jwt = manager();
        let other = JwtManager::new("another-secret-also-32-chars-long!!", 30, 14);

        let token = other
            .issue_access_token(Uuid::new_v4(), AccountRole::User)
            .expect("Failed to issue token");

        assert!(matches!(jwt.validate_token(&token), Err(JwtError::Invalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = manager();
        // Encode claims whose expiry is well past the 60s leeway window
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: AccountRole::User,
            category: TokenCategory::Access,
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode");

        assert!(matches!(jwt.validate_token(&token), Err(JwtError::Expired)));
        assert!(matches!(
            jwt.validate_access_token(&token),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_expiry_seconds() {
        assert_eq!(manager().access_token_expiry_seconds(), 30 * 60);
    }
}
