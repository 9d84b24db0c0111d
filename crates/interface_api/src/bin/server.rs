//! ACP Healthcare Insurance - API Server Binary
//!
//! This binary starts the HTTP API server.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin acp-health-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8001 DATABASE_URL=postgres://... cargo run --bin acp-health-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8001)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 1800)
//! * `API_DATABASE_URL` or `DATABASE_URL` - PostgreSQL connection string
//! * `API_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_BOOTSTRAP_ADMIN`, `API_ADMIN_USERNAME`, `API_ADMIN_EMAIL`,
//!   `API_ADMIN_PASSWORD` - Initial administrator account

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_identity::Argon2Hasher;
use domain_lifecycle::RandomNumberGenerator;
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresInsuranceStore};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting ACP Healthcare Insurance API Server"
    );

    let db_config = DatabaseConfig::new(&config.database_url)
        .max_connections(config.max_connections);
    let pool = create_pool(db_config)
        .await
        .context("connecting to the database")?;

    run_migrations(&pool)
        .await
        .context("applying database migrations")?;

    let store = Arc::new(PostgresInsuranceStore::new(pool));
    let state = AppState::new(
        store,
        Arc::new(Argon2Hasher::default()),
        Arc::new(RandomNumberGenerator),
        config.clone(),
    );

    if let Some(admin) = config.admin_bootstrap() {
        if let Some(user) = state
            .accounts
            .ensure_admin(&admin)
            .await
            .context("bootstrapping the administrator account")?
        {
            tracing::warn!(
                username = %user.username,
                "Created initial administrator; change its password"
            );
        }
    }

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from the environment, falling back to defaults
///
/// `DATABASE_URL` is honoured when `API_DATABASE_URL` is not set.
fn load_config() -> ApiConfig {
    let mut config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid API_* configuration ({}), using defaults", e);
        ApiConfig::default()
    });

    if std::env::var("API_DATABASE_URL").is_err() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
    }
    if std::env::var("API_LOG_LEVEL").is_err() {
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = level;
        }
    }

    config
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// If a handler cannot be installed, that branch never completes and the
/// other one still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
