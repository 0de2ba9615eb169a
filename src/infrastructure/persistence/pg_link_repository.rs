//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink, Owner};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, code, original_url, user_id, session_id, click_count, expires_at, created_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    original_url: String,
    user_id: Option<i64>,
    session_id: Option<i64>,
    click_count: i64,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.code,
            r.original_url,
            Owner::from_columns(r.user_id, r.session_id),
            r.click_count,
            r.expires_at,
            r.created_at,
        )
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// All statements are parameterized; owner scoping is applied in SQL so a
/// caller can never observe or touch another owner's rows.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let (user_id, session_id) = new_link.owner.as_columns();

        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (code, original_url, user_id, session_id, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.code)
        .bind(&new_link.original_url)
        .bind(user_id)
        .bind(session_id)
        .bind(new_link.expires_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_page(
        &self,
        owner: Owner,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let (user_id, session_id) = owner.as_columns();

        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE ($1::bigint IS NOT NULL AND user_id = $1)
               OR ($2::bigint IS NOT NULL AND session_id = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(user_id)
        .bind(session_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn increment_clicks(&self, link_id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE id = $1")
            .bind(link_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_owned(&self, code: &str, owner: Owner) -> Result<bool, AppError> {
        let (user_id, session_id) = owner.as_columns();
        let mut tx = self.pool.begin().await?;

        let link_id: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM links
            WHERE code = $1
              AND (($2::bigint IS NOT NULL AND user_id = $2)
                OR ($3::bigint IS NOT NULL AND session_id = $3))
            FOR UPDATE
            "#,
        )
        .bind(code)
        .bind(user_id)
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(link_id) = link_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("DELETE FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(link_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn transfer_session_links(
        &self,
        session_id: i64,
        user_id: i64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE links SET user_id = $1, session_id = NULL WHERE session_id = $2",
        )
        .bind(user_id)
        .bind(session_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        // link_clicks cascade on link deletion.
        let result =
            sqlx::query("DELETE FROM links WHERE expires_at IS NOT NULL AND expires_at < $1")
                .bind(now)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
