//! # Reminders API Server
//!
//! Authenticated CRUD over reminders. Anyone holding a valid access token
//! can read every reminder; only a reminder's owner can change or delete it.
//!
//! ## Usage
//!
//! ```bash
//! STORAGE_BACKEND=memory JWT_SECRET=... cargo run -p reminders-api
//! ```

use reminders_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StorageBackend},
};
use reminders_shared::{
    db::{migrations::run_migrations, pool},
    store::{memory::MemoryStore, postgres::PgStore, Storage},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "reminders_api=debug,reminders_shared=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Connects the configured backend; the pool is returned so it can be closed on exit
async fn open_storage(config: &Config) -> anyhow::Result<(Arc<dyn Storage>, Option<PgPool>)> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will not survive a restart");
            let store: Arc<dyn Storage> = Arc::new(MemoryStore::new());
            Ok((store, None))
        }
        StorageBackend::Postgres => {
            let url = config
                .database
                .url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres backend"))?;

            let pool = pool::create_pool(pool::DatabaseConfig {
                url,
                max_connections: config.database.max_connections,
                ..Default::default()
            })
            .await?;
            pool::health_check(&pool).await?;
            run_migrations(&pool).await?;

            let store: Arc<dyn Storage> = Arc::new(PgStore::new(pool.clone()));
            Ok((store, Some(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        "Reminders API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let (store, pg_pool) = open_storage(&config).await?;
    tracing::info!(backend = store.backend(), "Storage ready");

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pg_pool {
        pool::close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
