//! Shared helpers for integration tests
//!
//! Each test gets its own edge server on an ephemeral port serving a
//! throwaway static root, plus (when needed) a mock upstream standing in
//! for the detection backend.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tempfile::TempDir;

use dupgate::config::{AppState, Config};
use dupgate::server;

pub const INDEX_HTML: &[u8] = b"<!doctype html><html><body>dupcheck</body></html>";
pub const APP_JS: &[u8] = b"console.log('dupcheck');";
pub const STYLE_CSS: &[u8] = b"body{margin:0}";

/// Build a static root with a typical frontend build layout
pub fn frontend_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), APP_JS).unwrap();
    std::fs::write(dir.path().join("assets/style.css"), STYLE_CSS).unwrap();
    dir
}

/// Start the edge server on an ephemeral port with default settings
pub async fn start_edge(root: &TempDir, upstream: &str) -> SocketAddr {
    start_edge_with(root, upstream, |_| {}).await
}

/// Start the edge server with a configuration tweak applied on top of
/// the defaults
pub async fn start_edge_with(
    root: &TempDir,
    upstream: &str,
    tweak: impl FnOnce(&mut Config),
) -> SocketAddr {
    let mut cfg = Config::load_from("nonexistent-test-config").unwrap();
    cfg.server.host = "127.0.0.1".to_string();
    cfg.server.port = 0;
    cfg.static_files.root = root.path().to_str().unwrap().to_string();
    cfg.proxy.upstream = upstream.to_string();
    cfg.logging.access_log = false;
    tweak(&mut cfg);

    let addr = cfg.get_socket_addr().unwrap();
    let state = Arc::new(AppState::new(cfg).unwrap());
    let listener = server::create_listener(addr).unwrap();
    let bound = listener.local_addr().unwrap();

    tokio::spawn(server::run(listener, state));
    wait_until_listening(bound).await;
    bound
}

async fn wait_until_listening(addr: SocketAddr) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "server did not start listening on {addr}"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Start a mock upstream that answers like the detection backend
///
/// Echoes enough request detail (path, query, method, selected headers)
/// for tests to assert the forwarding contract.
pub async fn start_mock_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let _ = http1::Builder::new()
                    .serve_connection(io, service_fn(mock_backend))
                    .await;
            });
        }
    });

    addr
}

async fn mock_backend(
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<hyper::Response<Full<Bytes>>, std::convert::Infallible> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();
    let host = header(&req, "host");
    let origin = header(&req, "origin");

    let response = match path.as_str() {
        "/api/health" => json_response(200, serde_json::json!({"status": "healthy"})),
        "/api/v1/duplicate-check" => {
            let body = req.into_body().collect().await.unwrap().to_bytes();
            json_response(
                200,
                serde_json::json!({
                    "matches": [],
                    "received_bytes": body.len(),
                    "method": method,
                }),
            )
        }
        "/api/slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            json_response(200, serde_json::json!({"slow": true}))
        }
        "/api/echo" => json_response(
            200,
            serde_json::json!({
                "method": method,
                "path": path,
                "query": query,
                "host": host,
                "origin": origin,
            }),
        ),
        _ => json_response(404, serde_json::json!({"detail": "Not Found"})),
    };

    Ok(response)
}

fn json_response(status: u16, value: serde_json::Value) -> hyper::Response<Full<Bytes>> {
    hyper::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("x-backend", "mock")
        .body(Full::new(Bytes::from(value.to_string())))
        .unwrap()
}

fn header(req: &hyper::Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
