//! In-process storage backend.
//!
//! [`InMemoryStore`] implements every repository trait over a single set of
//! tables guarded by one async mutex, so multi-table operations such as
//! "delete link and its clicks" are atomic just like their SQL versions.
//! Used for `STORAGE_BACKEND=memory` and throughout the test suite.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::entities::{
    Click, GuestSession, Link, NewClick, NewLink, NewUser, Owner, User,
};
use crate::domain::repositories::{
    ClickRepository, LinkRepository, SessionRepository, UserRepository,
};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    links: BTreeMap<i64, Link>,
    clicks: BTreeMap<i64, Click>,
    sessions: BTreeMap<i64, GuestSession>,
    users: BTreeMap<i64, User>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove_link(&mut self, link_id: i64) {
        self.links.remove(&link_id);
        self.clicks.retain(|_, c| c.link_id != link_id);
    }
}

/// Newest first with id as tie breaker, matching the SQL ordering.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// In-memory implementation of all repository traits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let mut t = self.tables.lock().await;

        if t.links.values().any(|l| l.code == new_link.code) {
            return Ok(None);
        }

        let id = t.next_id();
        let link = Link::new(
            id,
            new_link.code,
            new_link.original_url,
            Some(new_link.owner),
            0,
            new_link.expires_at,
            Utc::now(),
        );
        t.links.insert(id, link.clone());

        Ok(Some(link))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.links.values().find(|l| l.code == code).cloned())
    }

    async fn find_page(
        &self,
        owner: Owner,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let t = self.tables.lock().await;

        let mut owned: Vec<Link> = t
            .links
            .values()
            .filter(|l| l.is_owned_by(owner))
            .cloned()
            .collect();
        newest_first(&mut owned, |l| (l.created_at, l.id));

        Ok(owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn increment_clicks(&self, link_id: i64) -> Result<(), AppError> {
        let mut t = self.tables.lock().await;
        if let Some(link) = t.links.get_mut(&link_id) {
            link.click_count += 1;
        }
        Ok(())
    }

    async fn delete_owned(&self, code: &str, owner: Owner) -> Result<bool, AppError> {
        let mut t = self.tables.lock().await;

        let link_id = t
            .links
            .values()
            .find(|l| l.code == code && l.is_owned_by(owner))
            .map(|l| l.id);

        match link_id {
            Some(id) => {
                t.remove_link(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transfer_session_links(
        &self,
        session_id: i64,
        user_id: i64,
    ) -> Result<u64, AppError> {
        let mut t = self.tables.lock().await;
        let mut moved = 0;

        for link in t.links.values_mut() {
            if link.owner == Some(Owner::Session(session_id)) {
                link.owner = Some(Owner::User(user_id));
                moved += 1;
            }
        }

        Ok(moved)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut t = self.tables.lock().await;

        let expired: Vec<i64> = t
            .links
            .values()
            .filter(|l| l.is_expired_at(now))
            .map(|l| l.id)
            .collect();
        for id in &expired {
            t.remove_link(*id);
        }

        Ok(expired.len() as u64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().await.links.len() as i64)
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut t = self.tables.lock().await;

        if !t.links.contains_key(&new_click.link_id) {
            return Err(AppError::internal(
                "click references a missing link",
                json!({ "link_id": new_click.link_id }),
            ));
        }

        let id = t.next_id();
        let click = Click::new(
            id,
            new_click.link_id,
            new_click.ip,
            new_click.user_agent,
            new_click.clicked_at,
        );
        t.clicks.insert(id, click.clone());

        Ok(click)
    }

    async fn list_by_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let t = self.tables.lock().await;

        let mut clicks: Vec<Click> = t
            .clicks
            .values()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        newest_first(&mut clicks, |c| (c.clicked_at, c.id));

        Ok(clicks)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().await.clicks.len() as i64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut t = self.tables.lock().await;
        let before = t.clicks.len();
        t.clicks.retain(|_, c| c.clicked_at >= cutoff);
        Ok((before - t.clicks.len()) as u64)
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<GuestSession, AppError> {
        let mut t = self.tables.lock().await;

        if t.sessions.values().any(|s| s.token_hash == token_hash) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "guest_sessions_token_hash_key" }),
            ));
        }

        let id = t.next_id();
        let now = Utc::now();
        let session = GuestSession {
            id,
            token_hash: token_hash.to_string(),
            expires_at,
            last_accessed: Some(now),
            created_at: now,
        };
        t.sessions.insert(id, session.clone());

        Ok(session)
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<GuestSession>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.sessions
            .values()
            .find(|s| s.token_hash == token_hash && s.is_active_at(now))
            .cloned())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<GuestSession>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.sessions
            .values()
            .find(|s| s.token_hash == token_hash)
            .cloned())
    }

    async fn touch(
        &self,
        session_id: i64,
        expires_at: DateTime<Utc>,
        last_accessed: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut t = self.tables.lock().await;
        if let Some(session) = t.sessions.get_mut(&session_id) {
            session.expires_at = expires_at;
            session.last_accessed = Some(last_accessed);
        }
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut t = self.tables.lock().await;

        let expired: Vec<i64> = t
            .sessions
            .values()
            .filter(|s| !s.is_active_at(now))
            .map(|s| s.id)
            .collect();

        for id in &expired {
            t.sessions.remove(id);
            // ON DELETE SET NULL
            for link in t.links.values_mut() {
                if link.owner == Some(Owner::Session(*id)) {
                    link.owner = None;
                }
            }
        }

        Ok(expired.len() as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut t = self.tables.lock().await;

        if t.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "email already registered",
                json!({ "email": new_user.email }),
            ));
        }

        let id = t.next_id();
        let user = User {
            id,
            email: new_user.email,
            display_name: new_user.display_name,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        t.users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let t = self.tables.lock().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let t = self.tables.lock().await;
        let mut users: Vec<User> = t.users.values().cloned().collect();
        newest_first(&mut users, |u| (u.created_at, u.id));
        Ok(users)
    }
}
