//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files; the
//! environment overlay in `loader.rs` writes into the same structures.

use serde::{Deserialize, Serialize};

/// Upstream content host used when nothing else is configured.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://raw.githubusercontent.com/";

/// Branch used for short-path expansion when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// User-Agent sent on every upstream request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; raw-proxy)";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Access token settings.
    pub auth: AuthConfig,

    /// Upstream content host and path expansion.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Access token configuration.
///
/// Both schemes are optional. When neither is set the deployment is open.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Global token accepted for any path (`TOKEN`).
    pub token: Option<String>,

    /// Path-scoped tokens, in declaration order (`TOKEN_PATH`).
    pub path_tokens: Vec<PathTokenRule>,
}

/// A token that is only valid below one path prefix.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PathTokenRule {
    /// Token the client must present.
    pub token: String,

    /// Path prefix, without the leading slash (e.g., "docs/public").
    pub path: String,
}

impl PathTokenRule {
    pub fn new(token: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            path: path.into(),
        }
    }
}

/// Upstream content host configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every resolved path is appended to. Always ends with '/'
    /// once validated.
    pub base_url: String,

    /// Default account for short paths (`GH_NAME`).
    pub account: Option<String>,

    /// Default repository for short paths (`GH_REPO`).
    pub repository: Option<String>,

    /// Default branch for short paths (`GH_BRANCH`).
    pub branch: String,

    /// Credential injected as `Authorization: token <credential>` (`GH_TOKEN`).
    pub credential: Option<String>,

    /// Body returned in place of a failed upstream response (`ERROR`).
    pub error_message: Option<String>,

    /// User-Agent sent upstream.
    pub user_agent: String,

    /// Route upstream requests through HTTP(S)_PROXY from the environment.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            account: None,
            repository: None,
            branch: DEFAULT_BRANCH.to_string(),
            credential: None,
            error_message: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_system_proxy: true,
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds (0 disables).
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_secs: 10 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
