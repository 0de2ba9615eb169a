//! Link creation, listing and deletion.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink, Owner};
use crate::domain::identity::Identity;
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::generate_code;
use crate::utils::url_validator::validate_url;

/// How many fresh codes to try before giving up on a collision streak.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Service for creating, listing and deleting shortened links.
///
/// Every operation is scoped to an [`Identity`]; a caller can only see and
/// delete what it owns.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheService>,
    short_url_base: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `short_url_base` is prepended verbatim to codes when building short URLs.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheService>,
        short_url_base: String,
    ) -> Self {
        Self {
            links,
            users,
            cache,
            short_url_base,
        }
    }

    /// Creates a short link owned by `identity`.
    ///
    /// # Code Generation
    ///
    /// Codes are random; the store rejects duplicates and a new code is tried,
    /// up to [`MAX_CODE_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute http(s)
    /// URL or `expires_at` is not in the future.
    /// Returns [`AppError::Unauthorized`] if the identity is unusable or names
    /// a user that no longer exists.
    /// Returns [`AppError::Internal`] if every attempted code collided or the
    /// store fails.
    pub async fn create_short_link(
        &self,
        identity: &Identity,
        original_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let original_url = validate_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(at) = expires_at
            && at <= Utc::now()
        {
            return Err(AppError::bad_request(
                "expires_at must be in the future",
                json!({ "expires_at": at }),
            ));
        }

        let owner = identity.owner()?;
        if let Owner::User(user_id) = owner
            && self.users.find_by_id(user_id).await?.is_none()
        {
            return Err(AppError::unauthorized("user not found", json!({})));
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_link = NewLink {
                code: generate_code()?,
                original_url: original_url.clone(),
                owner,
                expires_at,
            };
            let code = new_link.code.clone();

            match self.links.create(new_link).await? {
                Some(link) => {
                    tracing::info!(code = %link.code, "short link created");
                    return Ok(link);
                }
                None => tracing::warn!(code = %code, attempt, "short code collision"),
            }
        }

        Err(AppError::internal(
            "Failed to generate a unique short code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Returns one page of the caller's links, newest first.
    ///
    /// `page` and `limit` must already be clamped to positive values.
    /// Expired links are listed too.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the identity is unusable.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn history(
        &self,
        identity: &Identity,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let owner = identity.owner()?;
        let offset = (page - 1).saturating_mul(limit);

        self.links.find_page(owner, offset, limit).await
    }

    /// Deletes a link owned by `identity` together with its clicks, then
    /// evicts it from the redirect cache.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `code` is blank.
    /// Returns [`AppError::Unauthorized`] if the identity is unusable.
    /// Returns [`AppError::NotFound`] if the code does not exist or belongs to
    /// someone else; both cases look the same to the caller.
    pub async fn delete_link(&self, identity: &Identity, code: &str) -> Result<(), AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::bad_request("short code is required", json!({})));
        }

        let owner = identity.owner()?;

        if !self.links.delete_owned(code, owner).await? {
            return Err(AppError::not_found("URL not found", json!({})));
        }

        if let Err(e) = self.cache.invalidate(code).await {
            tracing::error!(code = %code, error = %e, "failed to invalidate cached redirect");
        }

        tracing::info!(code = %code, "short link deleted");
        Ok(())
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}{}", self.short_url_base, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::domain::repositories::{MockLinkRepository, MockUserRepository};
    use crate::infrastructure::cache::{CacheError, MockCacheService};
    use chrono::Duration;

    const BASE: &str = "http://localhost:8080/api/v1/url/redirect/";

    fn guest() -> Identity {
        Identity::Guest {
            session_id: 5,
            token: "tok".to_string(),
        }
    }

    fn stored(new_link: NewLink) -> Link {
        Link::new(
            1,
            new_link.code,
            new_link.original_url,
            Some(new_link.owner),
            0,
            new_link.expires_at,
            Utc::now(),
        )
    }

    fn service(
        links: MockLinkRepository,
        users: MockUserRepository,
        cache: MockCacheService,
    ) -> LinkService {
        LinkService::new(
            Arc::new(links),
            Arc::new(users),
            Arc::new(cache),
            BASE.to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_for_guest() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .withf(|l| l.owner == Owner::Session(5) && l.code.len() == 8)
            .times(1)
            .returning(|l| Ok(Some(stored(l))));

        let svc = service(links, MockUserRepository::new(), MockCacheService::new());
        let link = svc
            .create_short_link(&guest(), "https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(svc.short_url(&link.code), format!("{BASE}{}", link.code));
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let mut links = MockLinkRepository::new();
        let mut calls = 0;
        links.expect_create().times(3).returning(move |l| {
            calls += 1;
            if calls < 3 { Ok(None) } else { Ok(Some(stored(l))) }
        });

        let svc = service(links, MockUserRepository::new(), MockCacheService::new());
        assert!(
            svc.create_short_link(&guest(), "https://example.com", None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_create_gives_up_after_max_attempts() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|_| Ok(None));

        let svc = service(links, MockUserRepository::new(), MockCacheService::new());
        let err = svc
            .create_short_link(&guest(), "https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url_before_store() {
        let mut links = MockLinkRepository::new();
        links.expect_create().never();

        let svc = service(links, MockUserRepository::new(), MockCacheService::new());
        for bad in ["", "not a url", "ftp://example.com", "example.com"] {
            let err = svc.create_short_link(&guest(), bad, None).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_create_rejects_past_expiry() {
        let svc = service(
            MockLinkRepository::new(),
            MockUserRepository::new(),
            MockCacheService::new(),
        );
        let err = svc
            .create_short_link(
                &guest(),
                "https://example.com",
                Some(Utc::now() - Duration::minutes(1)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_for_unknown_user_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(MockLinkRepository::new(), users, MockCacheService::new());
        let err = svc
            .create_short_link(&Identity::User { user_id: 9 }, "https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
        assert_eq!(err.to_string(), "user not found");
    }

    #[tokio::test]
    async fn test_create_for_existing_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            Ok(Some(User {
                id,
                email: "a@b.c".to_string(),
                display_name: "A".to_string(),
                password_hash: "x".to_string(),
                created_at: Utc::now(),
            }))
        });
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .withf(|l| l.owner == Owner::User(9))
            .returning(|l| Ok(Some(stored(l))));

        let svc = service(links, users, MockCacheService::new());
        assert!(
            svc.create_short_link(&Identity::User { user_id: 9 }, "https://example.com", None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_history_translates_page_to_offset() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_page()
            .withf(|owner, offset, limit| {
                *owner == Owner::Session(5) && *offset == 10 && *limit == 10
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let svc = service(links, MockUserRepository::new(), MockCacheService::new());
        assert!(svc.history(&guest(), 2, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_requires_usable_identity() {
        let svc = service(
            MockLinkRepository::new(),
            MockUserRepository::new(),
            MockCacheService::new(),
        );
        let err = svc
            .history(&Identity::User { user_id: 0 }, 1, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let mut links = MockLinkRepository::new();
        links
            .expect_delete_owned()
            .withf(|code, owner| code == "abcdEFGH" && *owner == Owner::Session(5))
            .returning(|_, _| Ok(true));
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|code| code == "abcdEFGH")
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(links, MockUserRepository::new(), cache);
        svc.delete_link(&guest(), "abcdEFGH").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_not_owned_is_not_found() {
        let mut links = MockLinkRepository::new();
        links.expect_delete_owned().returning(|_, _| Ok(false));
        let mut cache = MockCacheService::new();
        cache.expect_invalidate().never();

        let svc = service(links, MockUserRepository::new(), cache);
        let err = svc.delete_link(&guest(), "abcdEFGH").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_survives_cache_failure() {
        let mut links = MockLinkRepository::new();
        links.expect_delete_owned().returning(|_, _| Ok(true));
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .returning(|_| Err(CacheError::OperationError("down".to_string())));

        let svc = service(links, MockUserRepository::new(), cache);
        assert!(svc.delete_link(&guest(), "abcdEFGH").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_blank_code_is_bad_request() {
        let mut links = MockLinkRepository::new();
        links.expect_delete_owned().never();

        let svc = service(links, MockUserRepository::new(), MockCacheService::new());
        let err = svc.delete_link(&guest(), "  ").await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }
}
