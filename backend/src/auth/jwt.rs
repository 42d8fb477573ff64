//! JWT token generation and validation
//!
//! Issues identity tokens with pre-computed keys. Tokens are stateless:
//! nothing is stored server-side and there is no revocation list.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use content_hub_shared::TokenError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// The user id carried in `sub`
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
///
/// Create once at startup and share through `AppState`; clones only
/// bump reference counts.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    token_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, token_expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            token_expiry_secs,
        }
    }

    /// Issue a token for a user, valid for the configured window
    #[inline]
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String> {
        let exp = issued_at + Duration::seconds(self.token_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Validate a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        Ok(token_data.claims)
    }

    /// Validate a token and return the user it identifies
    #[inline]
    pub fn verify_user(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify(token)?.user_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 86400)
    }

    /// Replace the first character of the signature segment
    fn tamper_signature(token: &str) -> String {
        let (rest, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        format!("{}.{}", rest, chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, 86400);
        assert_eq!(service.verify_user(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::seconds(86400 + 5);

        let token = service.issue_at(Uuid::new_v4(), issued_at).unwrap();

        assert_eq!(service.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_token_just_inside_window_accepted() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::seconds(86400 - 60);

        let token = service.issue_at(Uuid::new_v4(), issued_at).unwrap();

        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let service = create_test_service();
        let token = service.issue(Uuid::new_v4()).unwrap();

        let tampered = tamper_signature(&token);

        assert_ne!(tampered, token);
        assert_eq!(
            service.verify(&tampered).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let service = create_test_service();
        let other = JwtService::new("another-secret", 86400);

        let token = other.issue(Uuid::new_v4()).unwrap();

        assert_eq!(
            service.verify(&token).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = create_test_service();

        assert_eq!(
            service.verify("invalid.token.here").unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(service.verify("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_non_uuid_subject_is_malformed() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &service.keys.encoding).unwrap();

        assert!(service.verify(&token).is_ok());
        assert_eq!(service.verify_user(&token).unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let cloned = service.clone(); // Should be cheap due to Arc

        let token = service.issue(Uuid::new_v4()).unwrap();
        assert!(cloned.verify(&token).is_ok());
    }
}
