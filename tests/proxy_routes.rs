//! Integration tests for the reverse proxy path
//!
//! A mock upstream stands in for the detection backend; the dead-upstream
//! and slow-upstream cases verify the gateway error contract.

mod common;

use std::time::{Duration, Instant};

use common::{frontend_root, start_edge, start_edge_with, start_mock_upstream};

#[tokio::test]
async fn test_api_response_passes_through() {
    let root = frontend_root();
    let upstream = start_mock_upstream().await;
    let addr = start_edge(&root, &format!("http://{upstream}")).await;

    let resp = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    // Upstream headers survive the trip back
    assert_eq!(resp.headers().get("x-backend").unwrap(), "mock");
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_post_body_forwarded_and_result_returned() {
    let root = frontend_root();
    let upstream = start_mock_upstream().await;
    let addr = start_edge(&root, &format!("http://{upstream}")).await;

    let payload = r#"{"file_path":"docs/report.md"}"#;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{addr}/api/v1/duplicate-check"))
        .header("content-type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["matches"], serde_json::json!([]));
    assert_eq!(body["received_bytes"], payload.len());
    assert_eq!(body["method"], "POST");
}

#[tokio::test]
async fn test_path_query_and_rewritten_headers_reach_upstream() {
    let root = frontend_root();
    let upstream = start_mock_upstream().await;
    let addr = start_edge(&root, &format!("http://{upstream}")).await;

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/api/echo?output_path=result.md"))
        .header("origin", format!("http://{addr}"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    // The path is forwarded unchanged, prefix included
    assert_eq!(body["path"], "/api/echo");
    assert_eq!(body["query"], "output_path=result.md");
    // Host and Origin point at the upstream, not the edge
    assert_eq!(body["host"], upstream.to_string());
    assert_eq!(body["origin"], format!("http://{upstream}"));
}

#[tokio::test]
async fn test_non_get_methods_proxied() {
    let root = frontend_root();
    let upstream = start_mock_upstream().await;
    let addr = start_edge(&root, &format!("http://{upstream}")).await;

    let client = reqwest::Client::new();
    let resp = client
        .delete(format!("http://{addr}/api/echo"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["method"], "DELETE");
}

#[tokio::test]
async fn test_upstream_error_status_passes_through() {
    let root = frontend_root();
    let upstream = start_mock_upstream().await;
    let addr = start_edge(&root, &format!("http://{upstream}")).await;

    // Unmatched API paths must reach the upstream, never the SPA fallback
    let resp = reqwest::get(format!("http://{addr}/api/no/such/endpoint"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    assert_eq!(resp.headers().get("x-backend").unwrap(), "mock");
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Not Found");
}

#[tokio::test]
async fn test_dead_upstream_yields_502_within_bounds() {
    let root = frontend_root();
    let addr = start_edge(&root, "http://127.0.0.1:1").await;

    let started = Instant::now();
    let resp = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(resp.status(), 502);
    assert!(elapsed < Duration::from_secs(10), "502 took {elapsed:?}");
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_slow_upstream_yields_504_at_deadline() {
    let root = frontend_root();
    let upstream = start_mock_upstream().await;
    let addr = start_edge_with(&root, &format!("http://{upstream}"), |cfg| {
        cfg.proxy.request_timeout = 1;
    })
    .await;

    let started = Instant::now();
    let resp = reqwest::get(format!("http://{addr}/api/slow"))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(resp.status(), 504);
    assert!(
        elapsed >= Duration::from_secs(1) && elapsed < Duration::from_secs(3),
        "504 took {elapsed:?}"
    );
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_oversized_body_rejected_before_upstream() {
    let root = frontend_root();
    // Dead upstream proves the 413 fires without an upstream exchange
    let addr = start_edge_with(&root, "http://127.0.0.1:1", |cfg| {
        cfg.http.max_body_size = 1024;
    })
    .await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{addr}/api/v1/duplicate-check"))
        .body(vec![b'x'; 4096])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 413);
}

#[tokio::test]
async fn test_prefix_lookalike_path_is_not_proxied() {
    let root = frontend_root();
    let addr = start_edge(&root, "http://127.0.0.1:1").await;

    // With a dead upstream this would 502 if it were proxied
    let resp = reqwest::get(format!("http://{addr}/apiary"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap(), common::INDEX_HTML);
}
