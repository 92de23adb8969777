//! Conditional request support: `ETag` generation and cache policies.
//!
//! The policy split matters for SPA deploys: fingerprinted assets can sit
//! in caches, but the entry document must be revalidated on every use or
//! clients keep loading a stale application shell.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::Hasher;

/// Content tag for a file already held in memory
///
/// Byte length plus a 64-bit hash, quoted. Not cryptographic; collisions
/// only cost a spurious 304 for a client that already had matching bytes.
pub fn etag_for(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    hasher.write(content);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Evaluate `If-None-Match` against the current tag
///
/// Handles the `*` wildcard and comma-separated candidate lists. A match
/// means the client copy is current and a 304 is in order.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    let Some(candidates) = if_none_match else {
        return false;
    };
    candidates
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag)
}

/// How downstream caches may treat a response
#[derive(Debug, Clone, Copy)]
pub enum CachePolicy {
    /// Static asset: cacheable for `max_age` seconds
    Asset { max_age: u32 },
    /// Entry document: revalidate (via `ETag`) before every reuse
    Revalidate,
}

impl fmt::Display for CachePolicy {
    /// Renders the exact `Cache-Control` header value
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset { max_age } => write!(f, "public, max-age={max_age}"),
            Self::Revalidate => f.write_str("no-cache"),
        }
    }
}
