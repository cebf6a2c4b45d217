//! JWT access-token generation and validation.
//!
//! Tokens are HMAC-signed JWTs carrying a [`Claims`] payload. Only the HMAC
//! family (HS256/HS384/HS512) is accepted on the way in; tokens are minted
//! with HS256. Expiry is checked here with zero leeway rather than by
//! `jsonwebtoken`, so a token is valid up to and including its `exp` second.

use forum_core::error::CoreError;
use forum_core::types::DbId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens. `None` disables token
    /// operations; they fail with [`CoreError::Configuration`].
    pub secret: Option<String>,
    /// Access token lifetime in hours (default: 24).
    pub expiry_hours: i64,
}

/// Default access token expiry in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | yes      | --      |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`    |
    ///
    /// A missing or empty `JWT_SECRET` is logged; the server still starts so
    /// that public reads keep working.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_EXPIRY_HOURS` is set but not a positive integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        if secret.is_none() {
            tracing::error!("JWT_SECRET is not set; login and authenticated routes will fail");
        }

        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");
        assert!(expiry_hours > 0, "JWT_EXPIRY_HOURS must be positive");

        Self {
            secret,
            expiry_hours,
        }
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.expiry_hours * 3600
    }

    fn signing_key(&self) -> Result<&[u8], CoreError> {
        match self.secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret.as_bytes()),
            _ => Err(CoreError::Configuration(
                "JWT signing key is not configured".into(),
            )),
        }
    }
}

/// Generate an HS256 access token for `user_id`, valid from now.
pub fn generate_access_token(user_id: DbId, config: &JwtConfig) -> Result<String, CoreError> {
    generate_access_token_at(user_id, config, chrono::Utc::now().timestamp())
}

/// Generate an access token as if issued at Unix time `now`.
pub fn generate_access_token_at(
    user_id: DbId,
    config: &JwtConfig,
    now: i64,
) -> Result<String, CoreError> {
    let key = config.signing_key()?;
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + config.expires_in_secs(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(key),
    )
    .map_err(|e| CoreError::Internal(format!("Failed to sign token: {e}")))
}

/// Validate an access token against the current time.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, CoreError> {
    validate_token_at(token, config, chrono::Utc::now().timestamp())
}

/// Validate an access token against Unix time `now`.
///
/// - [`CoreError::ExpiredCredential`] when `now > exp`.
/// - [`CoreError::InvalidCredential`] for a bad signature, malformed token,
///   or a non-HMAC algorithm header.
pub fn validate_token_at(token: &str, config: &JwtConfig, now: i64) -> Result<Claims, CoreError> {
    let key = config.signing_key()?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(key), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidAlgorithm => {
                CoreError::InvalidCredential("Unexpected signing method".into())
            }
            ErrorKind::InvalidSignature => {
                CoreError::InvalidCredential("Signature verification failed".into())
            }
            _ => CoreError::InvalidCredential(format!("Malformed token: {e}")),
        })?;

    if now > claims.exp {
        return Err(CoreError::ExpiredCredential);
    }
    Ok(claims)
}
