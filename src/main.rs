//! HTTP server for the order-entry service.
//!
//! Endpoints: create order, list orders, cancel order, list funds, health.
//! Configuration comes from environment variables; `ORDERS_FILE` selects
//! the durable file-backed store, otherwise orders live in memory.

use order_entry::api;
use order_entry::audit::StdoutAuditSink;
use order_entry::coordinator::OrderCoordinator;
use order_entry::execution::{LegacyExecutionSimulator, SimulatorConfig};
use order_entry::persistence::FileOrderStore;
use order_entry::store::{InMemoryOrderStore, OrderStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    let _ = env_logger::try_init();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let latency = Duration::from_millis(env_u64("EXECUTION_LATENCY_MS", 1000));
    let jitter = Duration::from_millis(env_u64("EXECUTION_JITTER_MS", 0));
    let execution_timeout = Duration::from_millis(env_u64("EXECUTION_TIMEOUT_MS", 5000));

    let (store, next_order_id): (Arc<dyn OrderStore>, u64) = match std::env::var("ORDERS_FILE") {
        Ok(path) => {
            let store = FileOrderStore::open(&path).await.expect("open orders file");
            let next = store.max_order_id().await.map(|id| id.0 + 1).unwrap_or(1);
            eprintln!("orders persisted to {}", path);
            (Arc::new(store), next)
        }
        Err(_) => (Arc::new(InMemoryOrderStore::new()), 1),
    };

    let venue = Arc::new(LegacyExecutionSimulator::new(SimulatorConfig { latency, jitter }));
    let coordinator = Arc::new(
        OrderCoordinator::new(store, venue, Arc::new(StdoutAuditSink))
            .with_execution_timeout(execution_timeout)
            .with_next_order_id(next_order_id),
    );

    let app = api::create_router(coordinator);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("bind");
    eprintln!("listening on http://{}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .expect("serve");
}
