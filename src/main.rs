use std::sync::Arc;

use dupgate::config::{AppState, Config};
use dupgate::logger;
use dupgate::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Build the runtime by hand so worker threads follow configuration
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Validates the static root and the upstream URL; both are fatal
    // when wrong, there is nothing useful to serve without them
    let state = match AppState::new(cfg) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            logger::log_error(&e);
            return Err(e.into());
        }
    };

    let listener = match server::create_listener(addr) {
        Ok(listener) => listener,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to bind {addr}: {e}. Is another instance already running?"
            ));
            return Err(e.into());
        }
    };

    logger::log_server_start(&addr, &state, server::lan_ip());

    server::run(listener, state).await;

    Ok(())
}
