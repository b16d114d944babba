//! REST API integration tests. Spawn the server and call endpoints with reqwest.

use async_trait::async_trait;
use order_entry::audit::InMemoryAuditSink;
use order_entry::execution::{ExecutionReport, ExecutionVenue, LegacyExecutionSimulator, SimulatorConfig};
use order_entry::{api, ExecutionError, InMemoryOrderStore, Order, OrderCoordinator};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_app_with(venue: Arc<dyn ExecutionVenue>) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let coordinator = Arc::new(OrderCoordinator::new(
        Arc::new(InMemoryOrderStore::new()),
        venue,
        Arc::new(InMemoryAuditSink::new()),
    ));
    let app = api::create_router(coordinator);
    let handle = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, handle)
}

/// Server backed by the real simulator at a short latency.
async fn spawn_app() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    spawn_app_with(Arc::new(LegacyExecutionSimulator::new(SimulatorConfig {
        latency: Duration::from_millis(5),
        jitter: Duration::ZERO,
    })))
    .await
}

struct RejectingVenue;

#[async_trait]
impl ExecutionVenue for RejectingVenue {
    async fn execute(&self, _order: &Order) -> Result<ExecutionReport, ExecutionError> {
        Err(ExecutionError::Rejected("legacy system offline".into()))
    }
}

#[tokio::test]
async fn health_returns_ok() {
    let (addr, _handle) = spawn_app().await;
    let url = format!("http://{}/health", addr);
    let client = reqwest::Client::new();
    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn list_funds_returns_fixed_set() {
    let (addr, _handle) = spawn_app().await;
    let url = format!("http://{}/api/funds", addr);
    let client = reqwest::Client::new();
    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let funds: Vec<String> = response.json().await.unwrap();
    assert_eq!(funds, vec!["FundA", "FundB", "FundC"]);
}

#[tokio::test]
async fn create_order_runs_to_completed_with_computed_value() {
    let (addr, _handle) = spawn_app().await;
    let url = format!("http://{}/api/orders", addr);
    let body = serde_json::json!({
        "fundName": "FundA",
        "transactionType": "Buy",
        "quantity": 10
    });
    let client = reqwest::Client::new();
    let response = client.post(&url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), 201);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json.get("fundName"), Some(&serde_json::json!("FundA")));
    assert_eq!(json.get("orderValue"), Some(&serde_json::json!("1000")));
    assert_eq!(json.get("status"), Some(&serde_json::json!("Completed")));

    // Completed order cannot be cancelled afterwards.
    let id = json.get("id").and_then(|v| v.as_u64()).unwrap();
    let cancel_url = format!("http://{}/api/orders/{}/cancel", addr, id);
    let response = client.post(&cancel_url).send().await.unwrap();
    assert_eq!(response.status(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn create_order_unknown_fund_returns_400_and_persists_nothing() {
    let (addr, _handle) = spawn_app().await;
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "fundName": "FundX",
        "transactionType": "Buy",
        "quantity": 10
    });
    let url = format!("http://{}/api/orders", addr);
    let response = client.post(&url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), 400);
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json.get("error").unwrap().as_str().unwrap().contains("FundX"));

    let listed: Vec<serde_json::Value> = client
        .get(format!("http://{}/api/orders", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty(), "no record created for invalid input");
}

#[tokio::test]
async fn create_order_invalid_type_and_quantity_return_400() {
    let (addr, _handle) = spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/orders", addr);

    let body = serde_json::json!({
        "fundName": "FundA",
        "transactionType": "Hold",
        "quantity": 10
    });
    let response = client.post(&url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), 400);

    let body = serde_json::json!({
        "fundName": "FundA",
        "transactionType": "Buy",
        "quantity": 0
    });
    let response = client.post(&url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), 400);

    let body = serde_json::json!({
        "fundName": "FundA",
        "transactionType": "Buy",
        "quantity": -5
    });
    let response = client.post(&url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn downstream_failure_returns_500_and_order_rests_failed() {
    let (addr, _handle) = spawn_app_with(Arc::new(RejectingVenue)).await;
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "fundName": "FundB",
        "transactionType": "Sell",
        "quantity": 4
    });
    let url = format!("http://{}/api/orders", addr);
    let response = client.post(&url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), 500);
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json.get("error").is_some());

    // The record is retained, parked Failed.
    let listed: Vec<serde_json::Value> = client
        .get(format!("http://{}/api/orders", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].get("status"), Some(&serde_json::json!("Failed")));
}

#[tokio::test]
async fn cancel_nonexistent_order_returns_404() {
    let (addr, _handle) = spawn_app().await;
    let url = format!("http://{}/api/orders/999/cancel", addr);
    let client = reqwest::Client::new();
    let response = client.post(&url).send().await.unwrap();
    assert_eq!(response.status(), 404);
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn list_orders_newest_first_including_failed() {
    let (addr, _handle) = spawn_app_with(Arc::new(RejectingVenue)).await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/orders", addr);
    for quantity in [1, 2, 3] {
        let body = serde_json::json!({
            "fundName": "FundC",
            "transactionType": "Buy",
            "quantity": quantity
        });
        let response = client.post(&url).json(&body).send().await.unwrap();
        assert_eq!(response.status(), 500);
    }

    let listed: Vec<serde_json::Value> = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed.len(), 3);
    let ids: Vec<u64> = listed.iter().map(|o| o.get("id").unwrap().as_u64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted, "newest first");
    for order in &listed {
        assert_eq!(order.get("status"), Some(&serde_json::json!("Failed")));
    }
}

#[tokio::test]
async fn quantity_accepts_string_form() {
    let (addr, _handle) = spawn_app().await;
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "fundName": "FundC",
        "transactionType": "Sell",
        "quantity": "2.5"
    });
    let url = format!("http://{}/api/orders", addr);
    let response = client.post(&url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), 201);
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json.get("orderValue"), Some(&serde_json::json!("250.0")));
}
