use static_mounts::config::{AppState, Config};
use static_mounts::{logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Tokio runtime, thread count from `server.workers`
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
    let mounts = cfg.build_mounts()?;
    if mounts.is_empty() {
        logger::log_warning("No [[static]] mounts configured, every request will get 404");
    }

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg, mounts.len());

    let state = Arc::new(AppState::new(cfg, mounts));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local.run_until(server::serve_forever(listener, state)).await
}
