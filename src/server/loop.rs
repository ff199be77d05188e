// Server loop module
// Accepts connections until shutdown, then waits for in-flight requests

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::GatewayState;
use crate::logger;
use crate::storage::ObjectStore;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` resolves
///
/// After shutdown the listener is closed and active connections get up to
/// `performance.request_timeout` seconds to finish.
pub async fn run_server_loop<S, F>(
    listener: TcpListener,
    state: Arc<GatewayState<S>>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: ObjectStore + 'static,
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(state.performance.request_timeout);
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutting down with {} connection(s) still open",
                active_connections.load(Ordering::SeqCst)
            ));
            break;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }

    Ok(())
}
