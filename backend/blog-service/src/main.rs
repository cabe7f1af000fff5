use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_service::cache::{MemoryPageCache, PageCache, RedisPageCache};
use blog_service::db::{create_pool, run_migrations, ContentStore, DbConfig, PgContentStore};
use blog_service::handlers::{self, AppState};
use blog_service::middleware::{IdentityMiddleware, RequestTimingMiddleware};
use blog_service::Config;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn build_cache(config: &Config) -> Arc<dyn PageCache> {
    if let Some(url) = config.cache.redis_url.as_deref() {
        match RedisPageCache::connect(url).await {
            Ok(cache) => {
                tracing::info!("Index cache backed by Redis");
                return Arc::new(cache);
            }
            Err(e) => {
                tracing::warn!("Redis unavailable ({}), using in-process index cache", e);
            }
        }
    }

    tracing::info!("Index cache held in process");
    Arc::new(MemoryPageCache::new())
}

/// Blog Service
///
/// # Routes
///
/// - `/`, `/group/{slug}/`, `/profile/{username}/`, `/follow/` - feeds
/// - `/posts/{id}/`, `/create/`, `/posts/{id}/edit/` - posts
/// - `/posts/{id}/comment/` - comments
/// - `/profile/{username}/follow/`, `/profile/{username}/unfollow/` - follow graph
/// - `/api/v1/health`, `/api/v1/health/live` - health checks
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_cfg = DbConfig::new(
        config.database.url.clone(),
        config.database.max_connections,
    );
    tracing::debug!(?db_cfg, "database configuration");

    let pool = create_pool(db_cfg)
        .await
        .context("Failed to create database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Connected to database, migrations applied");

    let store: Arc<dyn ContentStore> = Arc::new(PgContentStore::new(pool));
    let cache = build_cache(&config).await;

    let state = web::Data::new(AppState::new(
        store.clone(),
        cache,
        Duration::from_secs(config.cache.index_ttl_secs),
        config.auth.login_url.clone(),
    ));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(IdentityMiddleware::new(store.clone()))
            .wrap(RequestTimingMiddleware)
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    let server_handle = server.handle();
    let server_task = actix_web::rt::spawn(server);

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping HTTP server");
    server_handle.stop(true).await;

    server_task
        .await
        .context("HTTP server task panicked")?
        .context("HTTP server failed")?;

    tracing::info!("blog-service stopped");
    Ok(())
}
