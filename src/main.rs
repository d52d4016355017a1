use mqtt_bridge::config::load_config;
use mqtt_bridge::transport::websocket::RelayServer;
use mqtt_bridge::utils;
use mqtt_bridge::utils::error::RelayError;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    utils::logging::init("info");

    if let Err(e) = run().await {
        error!("Relay failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), RelayError> {
    let settings = load_config()?;
    let server = RelayServer::bind(settings).await?;
    info!("WebSocket relay listening on ws://{}", server.local_addr()?);

    tokio::select! {
        _ = server.run() => {
            error!("WebSocket server exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    Ok(())
}
