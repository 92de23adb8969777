//! Static file serving module
//!
//! Resolves request paths against the built frontend under the static
//! root. A miss does not 404: the router falls back to the SPA entry
//! document so client-side routes deep-link correctly.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::cache::CachePolicy;
use crate::http::range::RangeOutcome;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a static asset for the request path
///
/// Returns `None` when the path does not resolve to a file under the
/// root, which sends the router to the SPA fallback.
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Option<Response<Full<Bytes>>> {
    let index = &state.config.static_files.index;
    let (content, content_type) = load_asset(&state.static_root, ctx.path, index).await?;

    // A direct hit on the entry document must revalidate like the
    // fallback copy, or stale shells outlive frontend deploys
    let policy = if ctx.path.trim_start_matches('/') == state.config.static_files.index {
        CachePolicy::Revalidate
    } else {
        CachePolicy::Asset {
            max_age: state.config.static_files.cache_max_age,
        }
    };

    Some(build_file_response(content, content_type, policy, ctx))
}

/// Serve the SPA entry document
///
/// Answers every non-API GET that matched no file on disk, so paths like
/// `/results/42` load the application shell and let the client router
/// take over.
pub async fn serve_entry_document(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let index_path = state.static_root.join(&state.config.static_files.index);
    match fs::read(&index_path).await {
        Ok(content) => {
            let content_type = mime::content_type_for(&index_path);
            build_file_response(content, content_type, CachePolicy::Revalidate, ctx)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Entry document '{}' unavailable: {e}",
                index_path.display()
            ));
            http::build_404_response()
        }
    }
}

/// Resolve a request path to a file under the static root
///
/// Directory paths resolve through the configured index document. `None`
/// is the common miss case and is not logged. The canonicalized path must
/// stay inside the root, which blocks traversal through `..` segments or
/// absolute-path joins.
pub async fn load_asset(
    static_root: &Path,
    path: &str,
    index: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let clean_path = path.trim_start_matches('/').replace("..", "");
    if clean_path.is_empty() {
        // The root path is the SPA entry, served by the fallback
        return None;
    }

    let mut file_path = static_root.join(&clean_path);
    if file_path.is_dir() {
        file_path = file_path.join(index);
    }
    let Ok(canonical) = file_path.canonicalize() else {
        return None;
    };
    if !canonical.starts_with(static_root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            canonical.display()
        ));
        return None;
    }
    if !canonical.is_file() {
        return None;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::content_type_for(&canonical);
    Some((content, content_type))
}

/// Build the response for a resolved file: conditional, ranged, or full
fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    policy: CachePolicy,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::etag_for(&data);
    let total_size = data.len();

    // Check if client has a current cached version
    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag, policy);
    }

    match http::evaluate_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Partial(range) => http::build_partial_response(
            Bytes::from(data[range.start..=range.end].to_vec()),
            content_type,
            &etag,
            policy,
            range,
            total_size,
            ctx.is_head,
        ),
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => {
            http::build_cached_response(Bytes::from(data), content_type, &etag, policy, ctx.is_head)
        }
    }
}
