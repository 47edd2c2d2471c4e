use std::path::PathBuf;

/// Broker service configuration, built once at start-up
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Listen port
    pub port: u16,

    /// Restrict the listener to the loopback interface
    /// - false: bind 0.0.0.0 (default, reachable from other services)
    /// - true: bind 127.0.0.1 only
    pub local_only: bool,

    /// Base URL of the authentication service, without trailing slash
    pub auth_service_url: String,

    /// Outbound request timeout (seconds). `None` waits indefinitely.
    pub request_timeout: Option<u64>,

    /// Upstream proxy configuration
    pub upstream_proxy: UpstreamProxyConfig,

    /// Per-request logging middleware
    pub logging_enabled: bool,

    /// Directory for rolling log files, console only when unset
    pub log_dir: Option<PathBuf>,
}

/// Upstream proxy configuration
#[derive(Debug, Clone, Default)]
pub struct UpstreamProxyConfig {
    /// Whether enabled
    pub enabled: bool,
    /// Proxy address (http://, https://, socks5://)
    pub url: String,
}

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8000";

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            local_only: false,
            auth_service_url: DEFAULT_AUTH_SERVICE_URL.to_string(),
            request_timeout: None,
            upstream_proxy: UpstreamProxyConfig::default(),
            logging_enabled: true,
            log_dir: None,
        }
    }
}

impl BrokerConfig {
    /// Get the actual listen address
    /// - local_only = false: "0.0.0.0"
    /// - local_only = true: "127.0.0.1"
    pub fn get_bind_address(&self) -> &str {
        if self.local_only {
            "127.0.0.1"
        } else {
            "0.0.0.0"
        }
    }
}
