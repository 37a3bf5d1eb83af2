use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
};

/// Lifetime of an issued token.
pub const TOKEN_TTL: Duration = Duration::days(7);

/// HS256 signing and verification keys derived from the server secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(TOKEN_TTL)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// User id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let decoded = decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        Uuid::parse_str(&decoded.claims.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&SecretString::from(secret.to_string()))
    }

    #[test]
    fn issued_token_round_trips() {
        let keys = keys("test-secret");
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).expect("token");
        assert_eq!(keys.verify(&token), Some(user_id));
    }

    #[test]
    fn token_expires_after_seven_days() {
        let keys = keys("test-secret");
        let token = keys.issue(Uuid::new_v4()).expect("token");
        let claims = decode::<Claims>(&token, &keys.decoding, &Validation::default())
            .expect("decode")
            .claims;
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn rejects_foreign_and_garbage_tokens() {
        let token = keys("one-secret").issue(Uuid::new_v4()).expect("token");
        assert_eq!(keys("another-secret").verify(&token), None);
        assert_eq!(keys("one-secret").verify("not.a.jwt"), None);
        assert_eq!(keys("one-secret").verify(""), None);
    }

    #[test]
    fn rejects_expired_token() {
        let keys = keys("test-secret");
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (past - TOKEN_TTL).timestamp() as usize,
            exp: past.timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("token");
        assert_eq!(keys.verify(&token), None);
    }
}
