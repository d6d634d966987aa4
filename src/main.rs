//! verdant-gateway server entry point.
//!
//! Connects the chain client and database, starts the event listener, and
//! serves the Axum HTTP API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use verdant_gateway::api;
use verdant_gateway::app_state::AppState;
use verdant_gateway::chain::{ActionChain, AlloyActionChain};
use verdant_gateway::config::GatewayConfig;
use verdant_gateway::domain::LogFailureSink;
use verdant_gateway::persistence::{ActionStore, PostgresActionStore};
use verdant_gateway::service::{ActionSubmitter, EventListener};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting verdant-gateway");

    // Database pool and migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;
    let store: Arc<dyn ActionStore> = Arc::new(PostgresActionStore::new(pool));

    // Chain client and service layer
    let chain: Arc<dyn ActionChain> = Arc::new(AlloyActionChain::connect(&config).await?);
    let submitter = Arc::new(ActionSubmitter::new(Arc::clone(&chain)));
    let listener = Arc::new(EventListener::new(
        chain,
        Arc::clone(&store),
        Arc::new(LogFailureSink),
        config.event_channel_capacity,
    ));

    // Subscription failures here are non-fatal: the listener stays
    // inactive and the status probe reports it until restarted.
    listener.start().await;

    // Build application state
    let app_state = AppState {
        submitter,
        store,
        listener,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
