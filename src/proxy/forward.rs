//! Request forwarding module
//!
//! Rewrites inbound API requests for the upstream and relays the
//! response. Only `Host`, `Origin` and hop-by-hop headers are touched;
//! method, path, query, remaining headers and body pass through
//! unchanged in both directions.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderMap, HeaderValue, HOST, ORIGIN};
use hyper::http::uri::PathAndQuery;
use hyper::{Request, Response};
use tokio::time::timeout;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::proxy::ProxyClient;

/// Hop-by-hop headers that must not be forwarded (RFC 7230 section 6.1)
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Forward an API request to the upstream and relay its response
///
/// Failures map to gateway statuses: exceeding the configured deadline
/// yields 504, any other failure on the upstream leg yields 502. The
/// edge server keeps serving either way.
pub async fn proxy_request(
    req: Request<Incoming>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();

    // The inbound body is buffered before the upstream leg starts; a
    // failure here is a client problem, not a gateway problem.
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_proxy_error(&path, &format!("failed to read request body: {e}"));
            return http::build_bad_request_response("failed to read request body");
        }
    };

    let outbound = match build_upstream_request(&parts, body, &state.proxy) {
        Ok(outbound) => outbound,
        Err(e) => {
            logger::log_proxy_error(&path, &format!("failed to build upstream request: {e}"));
            return http::build_bad_gateway_response("failed to build upstream request");
        }
    };

    let deadline = state.proxy.request_timeout();
    match timeout(deadline, exchange(outbound, &state.proxy)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            logger::log_proxy_error(&path, &format!("upstream request failed: {e}"));
            http::build_bad_gateway_response("upstream request failed")
        }
        Err(_) => {
            logger::log_proxy_error(
                &path,
                &format!("upstream timed out after {}s", deadline.as_secs()),
            );
            http::build_gateway_timeout_response("upstream request timed out")
        }
    }
}

/// Send the rewritten request and buffer the upstream response
async fn exchange(
    req: Request<Full<Bytes>>,
    client: &ProxyClient,
) -> Result<Response<Full<Bytes>>, Box<dyn std::error::Error + Send + Sync>> {
    let upstream_response = client.send(req).await?;
    let (parts, body) = upstream_response.into_parts();
    let body = body.collect().await?.to_bytes();

    let mut builder = Response::builder().status(parts.status);
    if let Some(headers) = builder.headers_mut() {
        copy_headers(&parts.headers, headers, false);
    }
    Ok(builder.body(Full::new(body))?)
}

/// Build the upstream request from the inbound request parts
///
/// The path and query are forwarded unchanged. `Host` is set to the
/// upstream authority and an `Origin` header, when present, is rewritten
/// to the upstream origin so the upstream does not reject the call as
/// cross-origin.
pub fn build_upstream_request(
    parts: &hyper::http::request::Parts,
    body: Bytes,
    client: &ProxyClient,
) -> Result<Request<Full<Bytes>>, hyper::http::Error> {
    let path_and_query = parts
        .uri
        .path_and_query()
        .cloned()
        .unwrap_or_else(|| PathAndQuery::from_static("/"));
    let uri = client.upstream_uri(&path_and_query)?;

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);

    if let Some(headers) = builder.headers_mut() {
        copy_headers(&parts.headers, headers, true);
        if let Ok(host) = HeaderValue::from_str(client.authority().as_str()) {
            headers.insert(HOST, host);
        }
        if parts.headers.contains_key(ORIGIN) {
            if let Ok(origin) = HeaderValue::from_str(&client.origin()) {
                headers.insert(ORIGIN, origin);
            }
        }
    }

    builder.body(Full::new(body))
}

/// Copy end-to-end headers, dropping hop-by-hop headers (and `Host` on
/// the request leg, which is rewritten by the caller)
fn copy_headers(from: &HeaderMap, to: &mut HeaderMap, is_request: bool) {
    for (name, value) in from {
        if is_request && name == HOST {
            continue;
        }
        // HeaderName is always lowercase
        if HOP_BY_HOP_HEADERS.contains(&name.as_str()) {
            continue;
        }
        to.append(name.clone(), value.clone());
    }
}
