//! HTTP protocol layer module
//!
//! Protocol-level functionality shared by the static file handler and the
//! reverse proxy, decoupled from routing decisions.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::evaluate_range;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_bad_gateway_response, build_bad_request_response,
    build_cached_response, build_gateway_timeout_response, build_options_response,
    build_partial_response,
};
