#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use snaplink::config::{CacheBackend, Config, StorageBackend};
use snaplink::domain::click_event::ClickEvent;
use snaplink::domain::entities::{Link, NewLink, Owner};
use snaplink::infrastructure::cache::{CacheService, MemoryCache};
use snaplink::routes::app;
use snaplink::state::{AppState, Repositories};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const SESSION_HEADER: &str = "x-session-token";

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn test_config() -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        database_url: None,
        cache_backend: CacheBackend::Memory,
        redis_url: None,
        cache_ttl_seconds: 3600,
        memory_cache_capacity: 1000,
        listen_addr: "127.0.0.1:0".to_string(),
        short_url_base: "http://sl.test/r/".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        click_queue_capacity: 1000,
        click_worker_concurrency: 4,
        behind_proxy: false,
        jwt_secret: "test-access-secret".to_string(),
        jwt_refresh_secret: "test-refresh-secret".to_string(),
        access_token_minutes: 15,
        refresh_token_days: 7,
        token_signing_secret: "test-signing-secret".to_string(),
        session_ttl_days: 30,
        cleanup_interval_minutes: 0,
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 1,
        db_max_lifetime: 1,
    }
}

/// Everything a test needs: the state, its repositories and the click queue.
pub struct TestApp {
    pub state: AppState,
    pub repos: Repositories,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_app() -> TestApp {
    let config = test_config();
    let repos = Repositories::in_memory();
    let cache: Arc<dyn CacheService> = Arc::new(MemoryCache::new(1000, 3600));
    let (tx, rx) = mpsc::channel(config.click_queue_capacity);

    let state = AppState::new(&repos, cache, tx, &config);

    TestApp {
        state,
        repos,
        click_rx: rx,
    }
}

pub fn server(state: AppState) -> TestServer {
    TestServer::new(app(state).layer(MockConnectInfoLayer)).unwrap()
}

/// Shortens `url` as the given guest (or a new one) and returns
/// `(short_code, session_token)`.
pub async fn shorten(server: &TestServer, url: &str, token: Option<&str>) -> (String, String) {
    let mut request = server
        .post("/api/v1/url/shorten")
        .json(&json!({ "original_url": url }));
    if let Some(token) = token {
        request = request.add_header(SESSION_HEADER, token);
    }

    let response = request.await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["data"]["short_code"].as_str().unwrap().to_string();
    (code, session_token(&response))
}

pub fn session_token(response: &axum_test::TestResponse) -> String {
    response
        .header(SESSION_HEADER)
        .to_str()
        .unwrap()
        .to_string()
}

/// Registers and logs in a user, returning the access token.
pub async fn login_user(server: &TestServer, email: &str) -> String {
    server
        .post("/api/v1/user/register")
        .json(&json!({ "email": email, "name": "Test", "password": "secret1" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/v1/user/login")
        .json(&json!({ "email": email, "password": "secret1" }))
        .await;
    response.assert_status_ok();

    response.json::<Value>()["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub async fn insert_link(
    repos: &Repositories,
    code: &str,
    url: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Link {
    repos
        .links
        .create(NewLink {
            code: code.to_string(),
            original_url: url.to_string(),
            owner: Owner::User(1),
            expires_at,
        })
        .await
        .unwrap()
        .unwrap()
}
