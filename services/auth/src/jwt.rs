//! JWT service for session token issuance and verification
//!
//! Sessions are stateless: a token is an HS256 JWT carrying the user id and
//! an absolute expiry. Nothing is stored server-side, so logging out only
//! discards the token on the client and a leaked token stays valid until it
//! expires.

use anyhow::Result;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Default session lifetime: 7 days
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in seconds (default: 7 days)
    pub token_expiry: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret, at least 32 bytes
    /// - `JWT_TOKEN_EXPIRY`: Token lifetime in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 bytes long");
        }

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .ok()
            .and_then(|value| value.parse().ok())
            .filter(|expiry: &i64| *expiry > 0)
            .unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

/// Token handed to a client after login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: i64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared by hand so the boundary is exact and the clock
        // can be supplied by the caller.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iat"]);

        JwtService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Issue a token for a verified user
    pub fn issue(&self, user_id: Uuid) -> AuthResult<IssuedToken> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> AuthResult<IssuedToken> {
        let iat = issued_at.timestamp();
        let exp = iat + self.token_expiry;

        let claims = Claims { sub: user_id, iat, exp };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("Failed to sign token: {}", e)))?;

        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::Crypto("Token expiry out of range".to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> AuthResult<Uuid> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against the given clock value
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Uuid> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!("Token rejected: {}", e);
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        AuthError::InvalidSignature
                    }
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Malformed,
                }
            })?;

        let claims = token_data.claims;
        if now.timestamp() >= claims.exp {
            warn!("Expired token presented for user {}", claims.sub);
            return Err(AuthError::Expired);
        }

        Ok(claims.sub)
    }

    /// Token lifetime in seconds
    pub fn token_expiry(&self) -> i64 {
        self.token_expiry
    }
}
