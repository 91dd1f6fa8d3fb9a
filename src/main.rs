use commerce_tools_rust::config::AppConfig;
use commerce_tools_rust::router::create_app_router;
use commerce_tools_rust::state::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,commerce_tools_rust=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration and initialize application state
    let config = AppConfig::from_env()?;
    tracing::info!(
        catalog = ?config.catalog_mode,
        backend = %config.commerce_base_url,
        cache = %config.cache_url,
        "Configuration loaded"
    );
    let state = Arc::new(AppState::from_config(&config).await?);

    // Build application router with all routes and middleware
    let app = create_app_router(state.clone());

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl_c");
            }
            tracing::info!("Shutting down");
        })
        .await?;

    state.shutdown().await;
    Ok(())
}
