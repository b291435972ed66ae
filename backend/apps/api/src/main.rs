//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthConfig, DocAuthRepository, SessionRepository};
use platform::docstore::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lpfacil_api=info,auth=info,pages=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let auth_config = AuthConfig {
        cookie_secure: config.production,
        password_pepper: config.password_pepper.clone(),
        ..AuthConfig::default()
    };

    match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            serve(Arc::new(PgDocumentStore::new(pool)), auth_config, &config).await
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("DATABASE_URL not set, using in-memory document store");
            serve(Arc::new(MemoryDocumentStore::new()), auth_config, &config).await
        }
        None => anyhow::bail!("DATABASE_URL must be set in environment"),
    }
}

async fn serve<S>(
    store: Arc<S>,
    auth_config: AuthConfig,
    config: &ServerConfig,
) -> anyhow::Result<()>
where
    S: DocumentStore + Send + Sync + 'static,
{
    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_repo = DocAuthRepository::new(store.clone());
    match SessionRepository::cleanup_expired(&auth_repo).await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    let app = app::build_app(store, auth_config, &config.frontend_origins);

    // Start server
    tracing::info!("Listening on {}", config.listen_addr);

    let listener = TcpListener::bind(config.listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
