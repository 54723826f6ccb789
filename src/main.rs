use std::process::ExitCode;
use std::sync::Arc;

use campusmap::config::{AppConfig, ConfigError, StoreBackend};
use campusmap::store::EntityStore;
use campusmap::store::memory::MemoryStore;
use campusmap::store::postgres::PgStore;
use campusmap::{db, routes, state};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn EntityStore>, StartupError> {
    match (config.store_backend, config.database_url.as_deref()) {
        (StoreBackend::Postgres, Some(url)) => {
            let pool = db::init_pool(url, config.db_max_connections).await?;
            tracing::info!(max_connections = config.db_max_connections, "postgres store ready");
            Ok(Arc::new(PgStore::new(pool)))
        }
        (StoreBackend::Postgres, None) => Err(ConfigError::MissingDatabaseUrl.into()),
        (StoreBackend::Memory, _) => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    if config.admin.is_none() {
        tracing::warn!("ADMIN_EMAIL not configured; admin login disabled");
    }

    let store = open_store(&config).await?;
    let state = state::AppState::new(store, &config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    tracing::info!(port = config.port, "campusmap listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}
