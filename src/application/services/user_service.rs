//! User registration, login and token refresh.

use serde_json::json;
use std::sync::Arc;

use crate::application::services::{IdentityService, TokenPair, TokenService};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Service for user accounts.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    links: Arc<dyn LinkRepository>,
    identity: Arc<IdentityService>,
    tokens: Arc<TokenService>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        links: Arc<dyn LinkRepository>,
        identity: Arc<IdentityService>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            links,
            identity,
            tokens,
        }
    }

    /// Registers a user. Input shape is validated by the request DTO.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is taken.
    /// Returns [`AppError::Internal`] if hashing or storage fails.
    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = email.trim();

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict(
                "email already registered",
                json!({ "email": email }),
            ));
        }

        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "failed to hash password");
            AppError::internal("failed to hash password", json!({}))
        })?;

        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                display_name: display_name.trim().to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Verifies credentials and issues a token pair.
    ///
    /// When `session_token` names a guest session, every link that session
    /// owns is transferred to the user, whether or not the session has
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown emails and wrong
    /// passwords alike.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        session_token: Option<&str>,
    ) -> Result<TokenPair, AppError> {
        let invalid = || AppError::unauthorized("invalid credentials", json!({}));

        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;

        let matches = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "stored password hash is unreadable");
            invalid()
        })?;
        if !matches {
            return Err(invalid());
        }

        if let Some(token) = session_token.filter(|t| !t.is_empty())
            && let Some(session) = self.identity.find_session(token).await?
        {
            let moved = self
                .links
                .transfer_session_links(session.id, user.id)
                .await?;
            tracing::info!(
                user_id = user.id,
                session_id = session.id,
                moved,
                "guest links transferred"
            );
        }

        self.tokens.issue_pair(user.id)
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid or its user
    /// no longer exists.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let user_id = self.tokens.verify_refresh(refresh_token).map_err(|_| {
            AppError::unauthorized("invalid refresh token", json!({}))
        })?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::unauthorized("invalid refresh token", json!({})));
        }

        self.tokens.issue_pair(user_id)
    }

    /// Loads a user profile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn get_user(&self, user_id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found", json!({})))
    }

    /// Lists all users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }
}
