//! Request handler module
//!
//! Responsible for request routing dispatch and business logic processing.
//! Routes split three ways: static assets from the frontend build, API
//! forwarding to the upstream backend, and the SPA fallback for
//! client-side routes.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
