// Application state module
// Immutable per-process state shared across request handlers

use std::path::PathBuf;

use super::types::Config;
use crate::logger::LogFormat;
use crate::proxy::ProxyClient;

/// Application state
///
/// Built once at startup and shared via `Arc`. Configuration is fixed for
/// the lifetime of the process, so nothing here needs interior mutability.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonicalized static root, the boundary for traversal checks
    pub static_root: PathBuf,
    pub proxy: ProxyClient,
    /// Parsed once so the per-request path never re-parses the pattern
    pub access_log_format: LogFormat,
}

impl AppState {
    /// Build the application state, validating everything that must be
    /// usable before the listener comes up.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic when the static root is missing or not a
    /// directory, or when the upstream URL cannot be parsed. Both are
    /// fatal startup conditions.
    pub fn new(config: Config) -> Result<Self, String> {
        let static_root = std::fs::canonicalize(&config.static_files.root).map_err(|e| {
            format!(
                "Static root '{}' not found or inaccessible: {e}",
                config.static_files.root
            )
        })?;
        if !static_root.is_dir() {
            return Err(format!(
                "Static root '{}' is not a directory",
                config.static_files.root
            ));
        }

        let proxy = ProxyClient::new(&config.proxy)?;
        let access_log_format = LogFormat::parse(&config.logging.access_log_format);

        Ok(Self {
            config,
            static_root,
            proxy,
            access_log_format,
        })
    }
}
