use std::path::PathBuf;

use crate::broker::config::{BrokerConfig, UpstreamProxyConfig};
use crate::error::{AppError, AppResult};

/// Load broker config from the process environment
pub fn load_broker_config() -> AppResult<BrokerConfig> {
    load_broker_config_from(|key| std::env::var(key).ok())
}

/// Load broker config through an arbitrary variable lookup.
///
/// Unset and blank variables fall back to defaults; present but invalid
/// values are a configuration error naming the variable.
pub fn load_broker_config_from<F>(lookup: F) -> AppResult<BrokerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mut config = BrokerConfig::default();

    // PORT wins over BROKER_PORT so hosting platforms can inject it
    if let Some((key, raw)) = var("PORT")
        .map(|v| ("PORT", v))
        .or_else(|| var("BROKER_PORT").map(|v| ("BROKER_PORT", v)))
    {
        config.port = raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a port number, got {:?}", key, raw)))?;
    }

    if let Some(raw) = var("BROKER_LOCAL_ONLY") {
        config.local_only = parse_bool("BROKER_LOCAL_ONLY", &raw)?;
    }

    if let Some(raw) = var("AUTH_SERVICE_URL") {
        config.auth_service_url = normalize_base_url(&raw)?;
    }

    if let Some(raw) = var("AUTH_SERVICE_TIMEOUT_SECS") {
        let secs: u64 = raw.parse().map_err(|_| {
            AppError::Config(format!(
                "AUTH_SERVICE_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                raw
            ))
        })?;
        config.request_timeout = Some(secs);
    }

    if let Some(url) = var("UPSTREAM_PROXY_URL") {
        config.upstream_proxy = UpstreamProxyConfig { enabled: true, url };
    }

    if let Some(raw) = var("LOGGING_ENABLED") {
        config.logging_enabled = parse_bool("LOGGING_ENABLED", &raw)?;
    }

    config.log_dir = var("BROKER_LOG_DIR").map(PathBuf::from);

    Ok(config)
}

fn parse_bool(key: &str, raw: &str) -> AppResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, raw
        ))),
    }
}

fn normalize_base_url(raw: &str) -> AppResult<String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| AppError::Config(format!("AUTH_SERVICE_URL {:?} is invalid: {}", raw, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "AUTH_SERVICE_URL must use http or https, got {:?}",
            parsed.scheme()
        )));
    }

    Ok(raw.trim_end_matches('/').to_string())
}
