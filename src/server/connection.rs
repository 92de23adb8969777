// Connection handling module
// Per-connection admission and HTTP/1.1 serving

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Admit an accepted connection and spawn its serving task.
///
/// A slot on the active counter is reserved before the limit check so
/// two racing accepts cannot both slip under the `max_connections` cap;
/// over the cap, the slot is released and the stream dropped.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    active: &Arc<AtomicUsize>,
) {
    let previous = active.fetch_add(1, Ordering::SeqCst);

    let limit = state
        .config
        .performance
        .max_connections
        .map_or(usize::MAX, |m| usize::try_from(m).unwrap_or(usize::MAX));
    if previous >= limit {
        active.fetch_sub(1, Ordering::SeqCst);
        logger::log_warning(&format!(
            "Connection limit reached ({limit}), rejecting {peer_addr}"
        ));
        return;
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    let state = Arc::clone(state);
    let active = Arc::clone(active);
    tokio::spawn(async move {
        serve_connection(stream, peer_addr, &state).await;
        active.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Serve one HTTP/1.1 connection to completion.
///
/// The whole connection is bounded by the larger of the read/write
/// timeouts; the proxy deadline is shorter, so gateway timeouts still
/// reach the client as responses before the connection is cut.
async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    let perf = &state.config.performance;
    let deadline = Duration::from_secs(perf.read_timeout.max(perf.write_timeout));

    let mut builder = http1::Builder::new();
    builder.keep_alive(perf.keep_alive_timeout > 0);

    let service_state = Arc::clone(state);
    let conn = builder.serve_connection(
        TokioIo::new(stream),
        service_fn(move |req| {
            let state = Arc::clone(&service_state);
            async move { handler::handle_request(req, state, peer_addr).await }
        }),
    );

    match tokio::time::timeout(deadline, conn).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => logger::log_warning(&format!(
            "Connection from {peer_addr} open past {}s, closing",
            deadline.as_secs()
        )),
    }
}
