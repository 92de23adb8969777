//! Edge server for the duplicate detection frontend.
//!
//! One process serves three kinds of traffic:
//! - static assets from the built frontend under the configured root
//! - `/api/*` requests, forwarded verbatim to the detection backend
//! - every other route, answered with the SPA entry document so
//!   client-side routing works on deep links and reloads
//!
//! The binary in `main.rs` wires configuration, logging, and the accept
//! loop together; everything else lives here so it can be exercised by
//! integration tests.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod proxy;
pub mod server;
