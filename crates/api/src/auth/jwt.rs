//! JWT access-token generation and validation.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload with the
//! user's id and email. There is a single long-lived token per login; no
//! refresh flow.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use planner_core::types::DbId;
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email address.
    pub email: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in days (default: 7).
    pub token_expiry_days: i64,
}

/// Default token expiry in days.
const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                | Required | Default |
    /// |------------------------|----------|---------|
    /// | `JWT_SECRET`           | **yes**  | --      |
    /// | `JWT_EXPIRY_DAYS`      | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_days: i64 = std::env::var("JWT_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            token_expiry_days,
        }
    }

    /// Token lifetime in seconds, as reported in auth responses.
    pub fn expiry_secs(&self) -> i64 {
        self.token_expiry_days * 24 * 60 * 60
    }
}

/// Generate an HS256 token for the given user.
pub fn generate_token(
    user_id: DbId,
    email: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: now + config.expiry_secs(),
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
