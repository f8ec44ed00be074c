use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use vaccination_registry::config::ServerConfig;
use vaccination_registry::{create_router, initialize_backend, logger, with_http_layers};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    logger::init_logger(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e.into());
    }

    let app_state = initialize_backend(&config).await?;
    let app = with_http_layers(create_router(app_state), &config)?;

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
