//! Request identity resolution: registered user or guest session.

use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::application::services::TokenService;
use crate::domain::entities::GuestSession;
use crate::domain::identity::Identity;
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Random bytes in a guest session token.
const SESSION_TOKEN_BYTES: usize = 32;

/// Resolves who is making a request.
///
/// Guest session tokens are hashed with HMAC-SHA256 (keyed by
/// `signing_secret`) before storage and lookup, so a database dump alone
/// cannot be replayed as session tokens.
pub struct IdentityService {
    sessions: Arc<dyn SessionRepository>,
    tokens: Arc<TokenService>,
    signing_secret: String,
    session_ttl: Duration,
}

impl IdentityService {
    /// Creates a new identity service.
    ///
    /// # Arguments
    ///
    /// - `sessions` - guest session storage
    /// - `tokens` - verifies bearer access tokens
    /// - `signing_secret` - HMAC key for session token hashes
    /// - `session_ttl_days` - sliding lifetime of a guest session
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        tokens: Arc<TokenService>,
        signing_secret: String,
        session_ttl_days: i64,
    ) -> Self {
        Self {
            sessions,
            tokens,
            signing_secret,
            session_ttl: Duration::days(session_ttl_days),
        }
    }

    /// Hashes a raw session token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Resolves the identity of a request.
    ///
    /// Priority order:
    ///
    /// 1. A bearer token that verifies as an access token yields
    ///    [`Identity::User`]. An invalid or expired bearer token is ignored
    ///    and resolution continues as a guest (fail-open).
    /// 2. A session token naming a live session extends that session to
    ///    `now + session_ttl` and yields [`Identity::Guest`].
    /// 3. Otherwise a new session with a fresh token is created.
    ///
    /// Exactly one session write happens on the guest path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if session storage fails.
    pub async fn resolve(
        &self,
        bearer: Option<&str>,
        session_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, AppError> {
        if let Some(token) = bearer.filter(|t| !t.is_empty()) {
            match self.tokens.verify_access(token) {
                Ok(user_id) => return Ok(Identity::User { user_id }),
                Err(_) => tracing::debug!("invalid bearer token, continuing as guest"),
            }
        }

        if let Some(token) = session_token.filter(|t| !t.is_empty()) {
            let token_hash = self.hash_token(token);
            if let Some(session) = self.sessions.find_active(&token_hash, now).await? {
                self.sessions
                    .touch(session.id, now + self.session_ttl, now)
                    .await?;
                return Ok(Identity::Guest {
                    session_id: session.id,
                    token: token.to_string(),
                });
            }
            tracing::debug!("unknown or expired session token, minting a new session");
        }

        let (session, token) = self.create_session(now).await?;
        Ok(Identity::Guest {
            session_id: session.id,
            token,
        })
    }

    /// Creates a new guest session and returns it together with its raw token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the RNG or session storage fails.
    pub async fn create_session(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(GuestSession, String), AppError> {
        let token = generate_session_token()?;
        let session = self
            .sessions
            .create(&self.hash_token(&token), now + self.session_ttl)
            .await?;

        metrics::counter!("guest_sessions_created_total").increment(1);
        tracing::debug!(session_id = session.id, "guest session created");

        Ok((session, token))
    }

    /// Looks up a session by raw token regardless of expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn find_session(&self, token: &str) -> Result<Option<GuestSession>, AppError> {
        self.sessions
            .find_by_token_hash(&self.hash_token(token))
            .await
    }
}

/// Generates an opaque session token: 32 OS-RNG bytes, URL-safe base64.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_session_token() -> Result<String, AppError> {
    let mut buffer = [0u8; SESSION_TOKEN_BYTES];
    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}
