//! Admin access tokens.
//!
//! Tokens are HS256-signed JWTs carrying [`Claims`]. There is no refresh
//! flow: an admin logs in again once the token expires.

use chrono::Utc;
use haosenyi_core::types::DbId;
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id.
    pub sub: DbId,
    /// Username as of issue time; the middleware re-reads the admin row.
    pub username: String,
    /// Unix seconds.
    pub exp: i64,
    /// Unix seconds.
    pub iat: i64,
    /// Random per-token id.
    pub jti: String,
}

impl Claims {
    fn issue(admin_id: DbId, username: &str, ttl_secs: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: admin_id,
            username: username.to_owned(),
            exp: iat + ttl_secs,
            iat,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` (required, non-empty) and `JWT_EXPIRY_HOURS`
    /// (default 24).
    ///
    /// # Panics
    ///
    /// When the secret is missing or blank, or the expiry is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(
            !secret.trim().is_empty(),
            "JWT_SECRET must be set to a non-empty value"
        );

        let expiry_hours = match std::env::var("JWT_EXPIRY_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .expect("JWT_EXPIRY_HOURS must be a whole number of hours"),
            Err(_) => DEFAULT_EXPIRY_HOURS,
        };

        Self {
            secret,
            expiry_hours,
        }
    }

    pub fn expires_in_secs(&self) -> i64 {
        self.expiry_hours * 60 * 60
    }

    /// HS256 only; `exp` is required and checked.
    fn validation() -> Validation {
        Validation::new(Algorithm::HS256)
    }
}

/// Sign a fresh token for `admin_id`.
pub fn generate_token(
    admin_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<String, JwtError> {
    let claims = Claims::issue(admin_id, username, config.expires_in_secs());
    let key = EncodingKey::from_secret(config.secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &key)
}

/// Check signature and expiry, returning the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &JwtConfig::validation()).map(|data| data.claims)
}
