//! DataGate HTTP/JSON gateway binary.

use clap::Parser;
use datagate_core::Store;
use datagate_gateway::{create_router, model, AppState, Args, GatewayConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        data = %config.data_path.display(),
        ephemeral = config.ephemeral,
        "Starting DataGate Gateway"
    );

    // Open the store and seal the type catalog
    let store = Store::open(config.store_config())?;
    let catalog = model::build_catalog()?;
    info!(registered_types = catalog.len(), "Catalog sealed");

    // Create application state
    let state = AppState::new(catalog, store, config.clone());

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
