use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archsite_api::config::{LogFormat, ServerConfig};
use archsite_api::router::build_app_router;
use archsite_api::state::AppState;
use archsite_db::DbPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "archsite_api=debug,archsite_db=debug,archsite_core=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let max = config.database.max_connections;
    let service_pool = match &config.database.service_url {
        Some(url) => {
            let pool = connect("service", url, max).await?;
            archsite_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; admin routes will answer 503");
            None
        }
    };
    let public_pool = match &config.database.public_url {
        Some(url) => Some(connect("public", url, max).await?),
        None => {
            tracing::warn!("PUBLIC_DATABASE_URL not set; public routes will answer 503");
            None
        }
    };
    if config.auth.jwt_secret.is_none() {
        tracing::warn!("AUTH_JWT_SECRET not set; admin routes will answer 503");
    }

    // --- App state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    let state = AppState {
        service_pool: service_pool.clone(),
        public_pool: public_pool.clone(),
        config: Arc::new(config),
    };
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, closing pools");
    for pool in [service_pool, public_pool].into_iter().flatten() {
        if tokio::time::timeout(shutdown_timeout, pool.close()).await.is_err() {
            tracing::warn!("Timed out waiting for database connections to close");
        }
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

async fn connect(tier: &'static str, url: &str, max_connections: u32) -> anyhow::Result<DbPool> {
    let pool = archsite_db::create_pool(url, max_connections)
        .await
        .with_context(|| format!("Failed to connect to the {tier} database"))?;
    archsite_db::health_check(&pool)
        .await
        .with_context(|| format!("{tier} database health check failed"))?;
    tracing::info!(tier, "Database connection pool created");
    Ok(pool)
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
