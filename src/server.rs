//! HTTP server initialization and runtime setup.
//!
//! Picks storage and cache backends, spawns background tasks and runs the
//! Axum server until a shutdown signal arrives.

use crate::application::services::MaintenanceService;
use crate::config::{CacheBackend, Config, StorageBackend};
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::routes::app_router;
use crate::state::{AppState, Repositories};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL with migrations, or in-memory)
/// - Redirect cache (Redis, moka or none)
/// - Background click worker
/// - Optional periodic expiry sweep
/// - Axum HTTP server with graceful shutdown
///
/// Queued clicks are flushed before returning.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repos = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_database(&config).await?;
            Repositories::postgres(Arc::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will not survive a restart");
            Repositories::in_memory()
        }
    };

    let cache = build_cache(&config).await;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repos.clicks.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!("Click worker started");

    let state = AppState::new(&repos, cache, click_tx, &config);

    if config.cleanup_interval_minutes > 0 {
        tokio::spawn(run_cleanup(
            state.maintenance_service.clone(),
            Duration::from_secs(config.cleanup_interval_minutes * 60),
        ));
    }

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last click sender; the worker now drains and exits.
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Click worker panicked");
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Opens the connection pool and applies pending migrations.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let memory = || -> Arc<dyn CacheService> {
        Arc::new(MemoryCache::new(
            config.memory_cache_capacity,
            config.cache_ttl_seconds,
        ))
    };

    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => {
            match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {e}. Using in-memory cache.");
                    memory()
                }
            }
        }
        (CacheBackend::Redis, None) | (CacheBackend::Memory, _) => {
            tracing::info!("Cache enabled (in-memory)");
            memory()
        }
        (CacheBackend::None, _) => {
            tracing::info!("Cache disabled");
            Arc::new(NullCache::new())
        }
    }
}

/// Sweeps expired data every `period`, starting one period from now.
async fn run_cleanup(maintenance: Arc<MaintenanceService>, period: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = maintenance.sweep(Utc::now()).await {
            tracing::error!(error = %e, "Expiry sweep failed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
