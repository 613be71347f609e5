use anyhow::{Context, Result};
use axum::{Router, extract::FromRef};
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::storage::SupabaseStorage;
use crate::supabase::SupabaseStore;

// Declare modules
mod auth;
mod auth_middleware;
mod browse;
mod config;
mod dashboard;
mod error;
mod filter;
mod form;
mod models;
mod routes;
mod storage;
mod supabase;

// Shared application state: configuration plus the injectable store and
// storage clients the handlers and controllers work against.
#[derive(Clone, FromRef)]
struct AppState {
    settings: Arc<Settings>,
    store: Arc<SupabaseStore>,
    storage: Arc<SupabaseStorage>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motormarket_rust=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing MotorMarket server...");

    // Load configuration
    let settings = match config::Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    let shared_settings = Arc::new(settings);

    // One shared HTTP client; both remote clients are built on top of it.
    let http_client = Client::builder()
        .build()
        .context("Failed to build shared reqwest client")?;

    let store = Arc::new(SupabaseStore::new(
        http_client.clone(),
        &shared_settings.supabase_url,
        &shared_settings.supabase_anon_key,
    ));
    let storage = Arc::new(SupabaseStorage::new(
        http_client,
        &shared_settings.supabase_url,
        &shared_settings.supabase_anon_key,
        &shared_settings.storage_bucket,
    ));
    tracing::info!("Remote store clients created.");

    let app_state = AppState {
        settings: shared_settings.clone(),
        store,
        storage,
    };

    let router: Router = routes::create_router(app_state);

    // Combine the router with static file serving
    let app = router.nest_service("/static", ServeDir::new("static"));

    // Parse the server address from settings
    let addr: SocketAddr = match shared_settings.server_address.parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(
                "Invalid server address format in configuration ('{}'): {}",
                shared_settings.server_address,
                e
            );
            return Err(anyhow::anyhow!(
                "Invalid server address format: {}",
                shared_settings.server_address
            ));
        }
    };

    // Create a TCP listener
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    // Run the server
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
