use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod models;
mod services;
mod storage;

use config::{Config, StoreBackend};
use models::TimestampFormatter;
use storage::{ContactStore, InMemoryContactStore, PgContactStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub timestamps: TimestampFormatter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load();
    tracing::info!("Starting server in {} mode", config.server.environment);

    let store: Arc<dyn ContactStore> = match config.storage.backend {
        StoreBackend::Postgres => {
            // Initialize database pool
            let db = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database_url())
                .await?;
            tracing::info!("Connected to PostgreSQL");

            // Run migrations
            sqlx::migrate!("./migrations").run(&db).await?;
            tracing::info!("Database migrations completed");

            Arc::new(PgContactStore::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory contact store; contacts are lost on restart");
            Arc::new(InMemoryContactStore::new())
        }
    };

    // Create app state
    let state = AppState {
        store,
        timestamps: config.timestamp_formatter(),
    };

    // Build router
    let app = api::router::create_router(state)
        .layer(RequestBodyLimitLayer::new(config.server.body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {} ({} store)", addr, config.storage.backend);

    axum::serve(listener, app).await?;

    Ok(())
}
