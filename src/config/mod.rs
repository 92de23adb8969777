// Configuration module entry point
// Loads layered configuration: config.toml <- environment <- built-in defaults

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ProxyConfig, ServerConfig, StaticConfig,
};

impl Config {
    /// Load configuration from the default `config.toml` (optional)
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; every key has a built-in default matching the
    /// original fixed constants (listen on 0.0.0.0:3000, proxy `/api` to
    /// `http://localhost:8000`, serve the working directory). Environment
    /// variables override both, e.g. `DUPGATE_SERVER__PORT=8080`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DUPGATE").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("static.root", ".")?
            .set_default("static.index", "index.html")?
            .set_default("static.cache_max_age", 3600)?
            .set_default("proxy.upstream", "http://localhost:8000")?
            .set_default("proxy.prefix", "/api")?
            .set_default("proxy.connect_timeout", 5)?
            .set_default("proxy.request_timeout", 30)?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            // Connection bound must outlive the proxy deadline so gateway
            // timeouts reach the client as 504s
            .set_default("performance.read_timeout", 60)?
            .set_default("performance.write_timeout", 60)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}
