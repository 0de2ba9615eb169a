//! Registered user account.

use chrono::{DateTime, Utc};

/// A registered user.
///
/// `password_hash` is an Argon2id PHC string and must never leave the
/// service layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}
