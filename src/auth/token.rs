use std::time::Duration;

use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of the `iss` claim on every token this service issues.
pub const TOKEN_ISSUER: &str = "mini-tracker";

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
///
/// Built once from configuration and shared by the auth service and the
/// request gate; keeps the secret out of the process environment at call time.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Generates a token for `user_id` expiring after the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expires_at = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!("token lifetime {:?} is out of range", self.ttl))
            })?;
        let claims = Claims {
            sub: user_id,
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature, expiry and issuer, and decodes the claims.
    ///
    /// Every failure is `AppError::Unauthorized("Unauthorized")`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(secret, Duration::from_secs(7 * 24 * 60 * 60))
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = issuer("test_secret_for_gen_verify");
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_token_expiration() {
        let tokens = issuer("test_secret_for_expiration");
        let now = chrono::Utc::now();
        let expired = tokens
            .sign(&Claims {
                sub: Uuid::new_v4(),
                iss: TOKEN_ISSUER.to_string(),
                iat: (now - chrono::Duration::hours(3)).timestamp(),
                exp: (now - chrono::Duration::hours(2)).timestamp(),
            })
            .unwrap();

        assert!(matches!(
            tokens.verify(&expired),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_token_is_rejected_as_soon_as_it_expires() {
        let tokens = issuer("test_secret_for_no_leeway");
        let now = chrono::Utc::now();
        let just_expired = tokens
            .sign(&Claims {
                sub: Uuid::new_v4(),
                iss: TOKEN_ISSUER.to_string(),
                iat: (now - chrono::Duration::minutes(1)).timestamp(),
                exp: (now - chrono::Duration::seconds(5)).timestamp(),
            })
            .unwrap();

        assert!(matches!(
            tokens.verify(&just_expired),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let tokens = TokenIssuer::new("secret", Duration::from_secs(u64::MAX));

        assert!(matches!(
            tokens.issue(Uuid::new_v4()),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = issuer("one_secret").issue(Uuid::new_v4()).unwrap();

        match issuer("a_completely_different_secret").verify(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Unauthorized"),
            other => panic!("expected unauthorized, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let tokens = issuer("shared_secret");
        let now = chrono::Utc::now();
        let foreign = tokens
            .sign(&Claims {
                sub: Uuid::new_v4(),
                iss: "someone-else".to_string(),
                iat: now.timestamp(),
                exp: (now + chrono::Duration::hours(1)).timestamp(),
            })
            .unwrap();

        assert!(tokens.verify(&foreign).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(
            issuer("secret").verify("not.a.jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
