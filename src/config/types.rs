// Configuration types module
// Defines all configuration sections for the edge server

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(rename = "static")]
    pub static_files: StaticConfig,
    pub proxy: ProxyConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Static asset configuration
///
/// `root` is the directory holding the built frontend; `index` is the
/// entry document returned for SPA fallback routes.
#[derive(Debug, Deserialize, Clone)]
pub struct StaticConfig {
    pub root: String,
    pub index: String,
    /// Cache-Control max-age (seconds) for static assets
    pub cache_max_age: u32,
}

/// Reverse proxy configuration
///
/// Requests whose path falls under `prefix` are forwarded to `upstream`
/// at the identical path (no prefix stripping).
#[derive(Debug, Deserialize, Clone)]
pub struct ProxyConfig {
    pub upstream: String,
    pub prefix: String,
    /// Upstream TCP connect timeout (seconds)
    pub connect_timeout: u64,
    /// Whole-exchange timeout for a proxied request (seconds)
    pub request_timeout: u64,
}

/// HTTP behavior configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}
