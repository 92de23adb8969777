// Server module entry point
// Listener construction, signal handling, and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use listener::{create_listener, lan_ip};
pub use server_loop::run;
