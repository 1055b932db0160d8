//! Gateway entry point.
//!
//! Startup contract: `APP_CONFIG_PATH` (secret-store path) and
//! `ALLOWED_HA_BASE_URL` (authorization root) are mandatory; absence of
//! either is a fatal startup error. `GATEWAY_BIND_ADDRESS` and
//! `GATEWAY_METRICS_ADDRESS` are optional.

use std::sync::Arc;

use tokio::net::TcpListener;

use ha_gateway::config::{ConfigCache, DirStore};
use ha_gateway::observability::{logging, metrics};
use ha_gateway::Gateway;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config_path = std::env::var("APP_CONFIG_PATH")
        .map_err(|_| "APP_CONFIG_PATH must be set to the secret-store path")?;
    let allowed_base_url = std::env::var("ALLOWED_HA_BASE_URL")
        .map_err(|_| "ALLOWED_HA_BASE_URL must be set to the authorized origin")?;

    // Catch a malformed allow-list origin at startup, not per request.
    url::Url::parse(&allowed_base_url)
        .map_err(|e| format!("ALLOWED_HA_BASE_URL is not a valid URL: {e}"))?;

    let bind_address =
        std::env::var("GATEWAY_BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());

    tracing::info!(
        config_path = %config_path,
        allowed_base_url = %allowed_base_url,
        bind_address = %bind_address,
        "Gateway starting"
    );

    if let Ok(metrics_address) = std::env::var("GATEWAY_METRICS_ADDRESS") {
        match metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let config_cache = ConfigCache::new(Arc::new(DirStore), config_path);

    // Fail fast when the secret store is unreachable or incomplete.
    config_cache.load()?;

    let listener = TcpListener::bind(&bind_address).await?;
    let gateway = Gateway::new(config_cache, &allowed_base_url);
    gateway.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
