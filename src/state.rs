//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    IdentityService, LinkService, MaintenanceService, RedirectService, TokenService, UserService,
};
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{
    ClickRepository, LinkRepository, SessionRepository, UserRepository,
};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgSessionRepository, PgUserRepository,
};

/// One implementation of every repository trait.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
        }
    }

    /// All four repositories backed by one shared [`InMemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            links: store.clone(),
            clicks: store.clone(),
            sessions: store.clone(),
            users: store,
        }
    }
}

/// Services and handles shared by all requests. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: Arc<IdentityService>,
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub user_service: Arc<UserService>,
    pub token_service: Arc<TokenService>,
    pub maintenance_service: Arc<MaintenanceService>,
    /// Used by the health check.
    pub links: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires every service from `repos`, `cache` and `config`.
    pub fn new(
        repos: &Repositories,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        config: &Config,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(
            &config.jwt_secret,
            &config.jwt_refresh_secret,
            config.access_token_minutes,
            config.refresh_token_days,
        ));

        let identity_service = Arc::new(IdentityService::new(
            repos.sessions.clone(),
            token_service.clone(),
            config.token_signing_secret.clone(),
            config.session_ttl_days,
        ));

        let link_service = Arc::new(LinkService::new(
            repos.links.clone(),
            repos.users.clone(),
            cache.clone(),
            config.short_url_base.clone(),
        ));

        let redirect_service = Arc::new(RedirectService::new(
            repos.links.clone(),
            cache.clone(),
            click_sender.clone(),
            config.cache_ttl_seconds,
        ));

        let user_service = Arc::new(UserService::new(
            repos.users.clone(),
            repos.links.clone(),
            identity_service.clone(),
            token_service.clone(),
        ));

        let maintenance_service = Arc::new(MaintenanceService::new(
            repos.links.clone(),
            repos.sessions.clone(),
            repos.clicks.clone(),
        ));

        Self {
            identity_service,
            link_service,
            redirect_service,
            user_service,
            token_service,
            maintenance_service,
            links: repos.links.clone(),
            cache,
            click_sender,
            behind_proxy: config.behind_proxy,
        }
    }
}
