//! Logger module
//!
//! Logging utilities for the edge server:
//! - startup banner with reachable local/network URLs
//! - access logging with multiple formats
//! - error and warning logging
//! - file-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, LogFormat};

use std::net::{IpAddr, SocketAddr};

use crate::config::{AppState, Config};

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to the info/access channel
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to the error channel
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Log the startup banner with the URLs the server is reachable on
///
/// When bound to all interfaces, both the loopback URL and the
/// LAN-reachable URL are shown (the latter only when discovery succeeded).
pub fn log_server_start(addr: &SocketAddr, state: &AppState, lan_ip: Option<IpAddr>) {
    let config = &state.config;
    let port = addr.port();

    write_info("--------------------------------------");
    write_info("dupgate edge server is up");
    if addr.ip().is_unspecified() {
        write_info(&format!("Local:    http://localhost:{port}"));
        if let Some(ip) = lan_ip {
            write_info(&format!("Network:  http://{ip}:{port}"));
        }
    } else {
        write_info(&format!("Listening on: http://{addr}"));
    }
    write_info(&format!(
        "Serving:  {} (entry: {})",
        state.static_root.display(),
        config.static_files.index
    ));
    write_info(&format!(
        "Proxy:    {} -> {}",
        config.proxy.prefix, config.proxy.upstream
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("--------------------------------------\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("Connection accepted: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log an upstream exchange failure (the client saw a gateway error)
pub fn log_proxy_error(path: &str, message: &str) {
    write_error(&format!("[PROXY] {path}: {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &LogFormat) {
    write_info(&entry.format(format));
}

pub fn log_shutdown() {
    write_info("Shutdown signal received, stopping accept loop");
}
