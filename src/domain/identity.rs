//! Caller identity resolved once per request.

use serde_json::json;

use crate::domain::entities::Owner;
use crate::error::AppError;

/// The caller of a request.
///
/// Produced by the identity middleware and passed explicitly to every
/// handler that needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A caller presenting a valid access token.
    User { user_id: i64 },
    /// An anonymous caller identified by a guest session.
    Guest { session_id: i64, token: String },
}

impl Identity {
    /// Returns the owner key used to scope link queries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the identity carries no usable id.
    pub fn owner(&self) -> Result<Owner, AppError> {
        match self {
            Identity::User { user_id } if *user_id > 0 => Ok(Owner::User(*user_id)),
            Identity::Guest { session_id, .. } if *session_id > 0 => {
                Ok(Owner::Session(*session_id))
            }
            _ => Err(AppError::unauthorized("unauthorized", json!({}))),
        }
    }

    /// Returns the guest token that must be echoed back to the client.
    pub fn session_token(&self) -> Option<&str> {
        match self {
            Identity::Guest { token, .. } => Some(token),
            Identity::User { .. } => None,
        }
    }
}
