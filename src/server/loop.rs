// Server loop module
// Accepts connections until Ctrl-C is received

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Accept connections until Ctrl-C
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`.
pub async fn serve_forever(
    listener: TcpListener,
    state: Arc<config::AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    serve_until(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to listen for Ctrl-C: {e}"));
            std::future::pending::<()>().await;
        }
        logger::log_shutdown();
    })
    .await
}

/// Accept connections until `shutdown` completes
///
/// Connections already being served keep running in their own tasks.
pub async fn serve_until(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: impl Future<Output = ()>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => return Ok(()),
        }
    }
}
