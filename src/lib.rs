pub mod broker; // Broker service module
pub mod error;
pub mod models;
pub mod modules;
pub mod utils;

use std::sync::Arc;

use broker::{AuthServiceClient, AxumServer};
use error::AppResult;
use modules::logger;
use tracing::info;

/// Run the broker until Ctrl-C
pub async fn run() -> AppResult<()> {
    let config = modules::config::load_broker_config()?;

    // Held until return so the file writer flushes
    let _log_guard = logger::init_logger(config.log_dir.as_deref())?;

    match config.request_timeout {
        Some(secs) => info!("Auth service calls time out after {}s", secs),
        None => info!("Auth service calls have no timeout (AUTH_SERVICE_TIMEOUT_SECS unset)"),
    }

    let http_client =
        utils::http::create_client(config.request_timeout, Some(&config.upstream_proxy))?;
    let upstream = Arc::new(AuthServiceClient::new(
        config.auth_service_url.clone(),
        http_client,
    ));
    info!("Forwarding to auth service at {}", upstream.base_url());

    let (server, handle) = AxumServer::start(&config, upstream).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    server.stop();
    handle
        .await
        .map_err(|e| error::AppError::Server(format!("Server task failed: {}", e)))?;

    Ok(())
}
