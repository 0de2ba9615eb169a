//! PostgreSQL implementation of guest session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::GuestSession;
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    token_hash: String,
    expires_at: DateTime<Utc>,
    last_accessed: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for GuestSession {
    fn from(r: SessionRow) -> Self {
        GuestSession {
            id: r.id,
            token_hash: r.token_hash,
            expires_at: r.expires_at,
            last_accessed: r.last_accessed,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for guest sessions.
///
/// Stores HMAC digests of session tokens. Raw tokens are never persisted.
pub struct PgSessionRepository {
    pool: Arc<PgPool>,
}

impl PgSessionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<GuestSession, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO guest_sessions (token_hash, expires_at, last_accessed)
            VALUES ($1, $2, NOW())
            RETURNING id, token_hash, expires_at, last_accessed, created_at
            "#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<GuestSession>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, token_hash, expires_at, last_accessed, created_at
            FROM guest_sessions
            WHERE token_hash = $1 AND expires_at >= $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(GuestSession::from))
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<GuestSession>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, token_hash, expires_at, last_accessed, created_at
            FROM guest_sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(GuestSession::from))
    }

    async fn touch(
        &self,
        session_id: i64,
        expires_at: DateTime<Utc>,
        last_accessed: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE guest_sessions
            SET expires_at = $2, last_accessed = $3
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .bind(expires_at)
        .bind(last_accessed)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM guest_sessions WHERE expires_at < $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
