mod cli;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use snip_cache::{MokaUrlCache, RedisUrlCache, UrlCache};
use snip_core::{Redirector, Repository, Shortener};
use snip_gateway::{App, AppState, IpRateLimiter};
use snip_redirector::RedirectorService;
use snip_shortener::{CodePolicy, HashGenerator, ShortenerService};
use snip_storage::{InMemoryRepository, MySqlRepository};
use snip_telemetry::TelemetryConfig;
use tracing::info;

use crate::cli::{CacheBackendArg, Cli, StorageBackendArg};

const PRUNE_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let config = Cli::parse();

    snip_telemetry::init(&TelemetryConfig {
        format: config.log_format,
        ..TelemetryConfig::default()
    })?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        "starting snip gateway"
    );

    let (repository, mysql) = build_repository(&config).await?;
    let cache = build_cache(&config).await?;

    let shortener: Arc<dyn Shortener> = Arc::new(ShortenerService::new(
        Arc::clone(&repository),
        Arc::clone(&cache),
        HashGenerator::new(),
        CodePolicy::default(),
    ));
    let redirector: Arc<dyn Redirector> = Arc::new(RedirectorService::new(repository, cache));
    let state = AppState::new(shortener, redirector, config.base_short_url.clone());

    let limiter = Arc::new(IpRateLimiter::new(
        config.rate_limit_per_second,
        config.rate_limit_burst,
    ));
    let pruner = limiter.spawn_pruner(PRUNE_PERIOD);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        App::router(state, limiter).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("http server failed")?;

    pruner.abort();
    if let Some(mysql) = mysql {
        mysql.close().await;
    }
    info!("gateway stopped");

    Ok(())
}

async fn build_repository(
    config: &Cli,
) -> anyhow::Result<(Arc<dyn Repository>, Option<MySqlRepository>)> {
    match config.storage {
        StorageBackendArg::InMemory => Ok((Arc::new(InMemoryRepository::new()), None)),
        StorageBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(dsn, config.mysql_max_connections)
                .await
                .context("failed to connect to mysql")?;
            repository
                .migrate()
                .await
                .context("failed to apply mysql migrations")?;
            Ok((Arc::new(repository.clone()), Some(repository)))
        }
    }
}

async fn build_cache(config: &Cli) -> anyhow::Result<Arc<dyn UrlCache>> {
    let ttl = Duration::from_secs(config.cache_ttl_secs);
    match config.cache {
        CacheBackendArg::Memory => Ok(Arc::new(MokaUrlCache::with_ttl(
            config.cache_capacity,
            ttl,
        ))),
        CacheBackendArg::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("redis url is required when cache backend is redis")?;
            let cache = RedisUrlCache::connect(url, ttl)
                .await
                .context("failed to connect to redis")?;
            Ok(Arc::new(cache))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received, draining connections");
}
