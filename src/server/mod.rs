// Local gateway module
// Hosts the handler behind an HTTP/1.1 server that builds gateway events

pub mod adapter;
pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is named server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::run_server_loop;

use std::sync::Arc;

use crate::config::{Config, HttpConfig, PerformanceConfig};
use crate::handler::SolutionsHandler;
use crate::logger;
use crate::storage::ObjectStore;

/// Everything a connection needs, shared by all connections
pub struct GatewayState<S> {
    pub handler: SolutionsHandler<S>,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Bind the configured address and serve until SIGINT/SIGTERM
pub async fn serve<S: ObjectStore + 'static>(
    config: &Config,
    handler: SolutionsHandler<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;
    logger::log_listening(&listener.local_addr()?);

    let state = Arc::new(GatewayState {
        handler,
        performance: config.performance.clone(),
        http: config.http.clone(),
    });

    // Connections are spawned with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(run_server_loop(listener, state, signal::shutdown_signal()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayloadFormat;
    use crate::handler::ObjectLocation;
    use crate::storage::MemoryStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn exchange(addr: std::net::SocketAddr, raw: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_serves_put_over_tcp() {
        let store = MemoryStore::new();
        let handler = SolutionsHandler::new(
            store.clone(),
            ObjectLocation {
                bucket: "bucket".to_string(),
                key: "data/solutions.json".to_string(),
            },
        );
        let state = Arc::new(GatewayState {
            handler,
            performance: PerformanceConfig {
                keep_alive: false,
                request_timeout: 5,
                max_connections: Some(4),
            },
            http: HttpConfig {
                max_body_size: 1024,
                payload_format: PayloadFormat::V2,
            },
        });

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let server = tokio::task::spawn_local(run_server_loop(listener, state, async {
                    let _ = stop_rx.await;
                }));

                let body = r#"{"categories": [], "features": {}, "solutions": []}"#;
                let raw = format!(
                    "PUT /anything HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let response = exchange(addr, &raw).await;
                assert!(response.starts_with("HTTP/1.1 200"), "{response}");
                assert!(response.contains(r#""success": true"#), "{response}");

                let response = exchange(
                    addr,
                    "DELETE / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 405"), "{response}");

                stop_tx.send(()).unwrap();
                server.await.unwrap().unwrap();
            })
            .await;

        assert_eq!(store.write_count(), 1);
    }
}
