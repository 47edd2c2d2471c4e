use reqwest::{Client, Proxy};
use std::time::Duration;

use crate::broker::config::UpstreamProxyConfig;
use crate::error::AppResult;

/// Create the shared outbound HTTP client.
///
/// `timeout_secs = None` leaves requests unbounded. An unusable proxy address
/// is logged and skipped rather than failing start-up.
pub fn create_client(
    timeout_secs: Option<u64>,
    proxy_config: Option<&UpstreamProxyConfig>,
) -> AppResult<Client> {
    let mut builder = Client::builder();

    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            match Proxy::all(&config.url) {
                Ok(proxy) => {
                    builder = builder.proxy(proxy);
                    tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
                }
                Err(e) => {
                    tracing::error!("Invalid proxy address: {}, error: {}", config.url, e);
                }
            }
        }
    }

    Ok(builder.build()?)
}
