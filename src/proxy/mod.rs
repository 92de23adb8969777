//! Reverse proxy module
//!
//! Forwards API-prefixed requests to the configured upstream origin with
//! the path unchanged and relays the response as-is. Uses the same HTTP
//! protocol helpers as the static file handler.

pub mod client;
pub mod forward;

// Re-export main entry points
pub use client::ProxyClient;
pub use forward::proxy_request;
