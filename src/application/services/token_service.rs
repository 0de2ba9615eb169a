//! JWT access and refresh token issuance.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// Claims carried by both token kinds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies HS256 tokens.
///
/// Access and refresh tokens are signed with different secrets and carry a
/// `token_type` claim, so neither can stand in for the other.
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// # Arguments
    ///
    /// - `access_secret` - key for access tokens (`JWT_SECRET`)
    /// - `refresh_secret` - key for refresh tokens (`JWT_REFRESH_SECRET`)
    /// - `access_minutes` / `refresh_days` - token lifetimes
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_minutes: i64,
        refresh_days: i64,
    ) -> Self {
        Self {
            access: KeyPair::from_secret(access_secret),
            refresh: KeyPair::from_secret(refresh_secret),
            access_ttl: Duration::minutes(access_minutes),
            refresh_ttl: Duration::days(refresh_days),
        }
    }

    /// Issues a new access/refresh pair for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails.
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.sign(user_id, ACCESS, self.access_ttl, &self.access.encoding)?,
            refresh_token: self.sign(user_id, REFRESH, self.refresh_ttl, &self.refresh.encoding)?,
        })
    }

    /// Verifies an access token and returns its user id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for a bad signature, an expired
    /// token, a refresh token, or a malformed subject.
    pub fn verify_access(&self, token: &str) -> Result<i64, AppError> {
        Self::verify(token, ACCESS, &self.access.decoding)
    }

    /// Verifies a refresh token and returns its user id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is not a valid refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<i64, AppError> {
        Self::verify(token, REFRESH, &self.refresh.decoding)
    }

    fn sign(
        &self,
        user_id: i64,
        token_type: &str,
        ttl: Duration,
        key: &EncodingKey,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            AppError::internal("Failed to issue token", json!({}))
        })
    }

    fn verify(token: &str, expected_type: &str, key: &DecodingKey) -> Result<i64, AppError> {
        let invalid = || AppError::unauthorized("Invalid token", json!({}));

        let data = decode::<Claims>(token, key, &Validation::default()).map_err(|_| invalid())?;

        if data.claims.token_type != expected_type {
            return Err(invalid());
        }

        data.claims
            .sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(invalid)
    }
}
