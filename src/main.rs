use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use traindash_server::config::Config;
use traindash_server::history::HistoricalStore;
use traindash_server::live::transportapi::TransportApiClient;
use traindash_server::routes::{create_router, AppState};
use traindash_server::stations::StationRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "traindash_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // A missing historical file only disables the trend sections.
    let history = match HistoricalStore::load(&config.historical_data_path) {
        Ok(store) => {
            tracing::info!(
                path = %config.historical_data_path,
                rows = store.len(),
                "loaded historical delay data"
            );
            Some(Arc::new(store))
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                "historical delay data unavailable, trend sections disabled"
            );
            None
        }
    };

    let live_client = Arc::new(TransportApiClient::new(config.clone()));

    let state = AppState {
        config: Arc::new(config),
        stations: Arc::new(StationRegistry::new()),
        live_client,
        cache: Arc::new(Mutex::new(HashMap::new())),
        history,
    };

    let app: Router = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("Server starting on http://0.0.0.0:8080");

    axum::serve(listener, app).await?;

    Ok(())
}
