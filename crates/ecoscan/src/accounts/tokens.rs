use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::Serialize;
use serde_json::Value;

use super::claims::{decode_user_id, ClaimFormatError};
use super::domain::UserId;

const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("invalid token claims: {0}")]
    Claim(#[from] ClaimFormatError),
    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize)]
struct AccessClaims {
    user_id: i64,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 access tokens and opaque refresh tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue_access(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            user_id: user_id.0,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::Signing(err.to_string()))
    }

    /// 32 random bytes, URL-safe base64.
    pub fn issue_refresh(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE.encode(bytes)
    }

    pub fn refresh_expiry(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + self.refresh_ttl
    }

    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = jsonwebtoken::decode::<HashMap<String, Value>>(
            token,
            &self.decoding,
            &self.validation,
        )
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(err.to_string()),
        })?;

        Ok(decode_user_id(data.claims.get("user_id"))?)
    }
}
