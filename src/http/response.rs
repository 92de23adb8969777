//! Response construction for every status the edge server produces.
//!
//! Gateway errors carry a JSON `detail` body matching the error
//! convention of the upstream API; local errors stay plain text.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::Response;

use super::cache::CachePolicy;
use super::range::ByteRange;

/// Complete a response, degrading to an empty one if the builder was fed
/// an invalid header value (logged; must not take the connection down)
fn finish(builder: Builder, body: Full<Bytes>) -> Response<Full<Bytes>> {
    builder.body(body).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

/// Plain-text error response
fn plain(status: u16, message: &'static str) -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(status)
            .header("Content-Type", "text/plain"),
        Full::new(Bytes::from_static(message.as_bytes())),
    )
}

/// Error response shaped like the upstream API's own errors
fn json_detail(status: u16, detail: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "detail": detail }).to_string();
    finish(
        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .header("Content-Length", body.len()),
        Full::new(Bytes::from(body)),
    )
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, policy: CachePolicy) -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(304)
            .header("ETag", etag)
            .header("Cache-Control", policy.to_string()),
        Full::new(Bytes::new()),
    )
}

/// Build 404 Not Found response (only produced for a missing entry document)
pub fn build_404_response() -> Response<Full<Bytes>> {
    plain(404, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(405)
            .header("Content-Type", "text/plain")
            .header("Allow", "GET, HEAD, OPTIONS"),
        Full::new(Bytes::from_static(b"405 Method Not Allowed")),
    )
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    plain(413, "413 Payload Too Large")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(416)
            .header("Content-Type", "text/plain")
            .header("Content-Range", format!("bytes */{file_size}")),
        Full::new(Bytes::from_static(b"Range Not Satisfiable")),
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type, Range")
            .header("Access-Control-Max-Age", "86400");
    }

    finish(builder, Full::new(Bytes::new()))
}

/// Build 400 Bad Request response with a JSON detail body
pub fn build_bad_request_response(detail: &str) -> Response<Full<Bytes>> {
    json_detail(400, detail)
}

/// Build 502 Bad Gateway response with a JSON detail body
///
/// Returned when the upstream refuses the connection or fails mid-exchange.
pub fn build_bad_gateway_response(detail: &str) -> Response<Full<Bytes>> {
    json_detail(502, detail)
}

/// Build 504 Gateway Timeout response with a JSON detail body
///
/// Returned when the proxied exchange exceeds the configured deadline.
pub fn build_gateway_timeout_response(detail: &str) -> Response<Full<Bytes>> {
    json_detail(504, detail)
}

/// Build a 200 response for a whole file
///
/// HEAD gets the same headers (including the real Content-Length) with
/// an empty body.
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    finish(
        Response::builder()
            .status(200)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length)
            .header("Accept-Ranges", "bytes")
            .header("ETag", etag)
            .header("Cache-Control", policy.to_string()),
        Full::new(body),
    )
}

/// Build a 206 response for a resolved byte range
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    policy: CachePolicy,
    range: ByteRange,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head { Bytes::new() } else { data };

    finish(
        Response::builder()
            .status(206)
            .header("Content-Type", content_type)
            .header("Content-Length", range.byte_count())
            .header(
                "Content-Range",
                format!("bytes {}-{}/{total_size}", range.start, range.end),
            )
            .header("Accept-Ranges", "bytes")
            .header("ETag", etag)
            .header("Cache-Control", policy.to_string()),
        Full::new(body),
    )
}
