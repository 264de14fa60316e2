use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::json;

use stockhold_api::app::{
    build_app,
    services::{demo_seed, stop_sweeper},
};
use stockhold_core::{Clock, ManualClock, SequentialIdGenerator};
use stockhold_infra::ExpirySweeper;
use stockhold_inventory::InventoryService;

struct TestServer {
    base_url: String,
    clock: Arc<ManualClock>,
    service: Arc<InventoryService>,
    handle: tokio::task::JoinHandle<()>,
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 1, 15, 9, 59).unwrap()
}

impl TestServer {
    async fn spawn() -> Self {
        let ids = Arc::new(SequentialIdGenerator::new());
        let clock = Arc::new(ManualClock::new(t0() + ChronoDuration::hours(1)));
        let seed = demo_seed(ids.as_ref(), t0()).unwrap();
        let service = Arc::new(InventoryService::from_seed(seed, clock.clone(), ids).unwrap());

        // Same router as prod, bound to an ephemeral port.
        let app = build_app(service.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            clock,
            service,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn place_hold(
    client: &reqwest::Client,
    server: &TestServer,
    item: &str,
    warehouse: &str,
    amount: u64,
) -> reqwest::Response {
    client
        .post(server.url("/place_hold"))
        .json(&json!({ "item_id": item, "warehouse_id": warehouse, "amount": amount }))
        .send()
        .await
        .unwrap()
}

async fn snapshot(client: &reqwest::Client, server: &TestServer, at: Option<&str>) -> serde_json::Value {
    let mut req = client.get(server.url("/inventory_snapshot"));
    if let Some(at) = at {
        req = req.query(&[("at", at)]);
    }
    let res = req.send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn place_snapshot_execute_flow() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let t1 = server.clock.now().to_rfc3339();

    let res = place_hold(&client, &server, "ABC123", "WH1", 30).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let hold_id = body["hold_id"].as_str().unwrap().to_string();

    let snap = snapshot(&client, &server, Some(&t1)).await;
    assert_eq!(snap, json!({ "ABC123:WH1": 70, "DEF456:WH2": 200 }));

    let res = client
        .post(server.url("/execute_hold"))
        .json(&json!({ "item_id": "ABC123", "warehouse_id": "WH1", "hold_id": hold_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "executed");

    let res = client
        .get(server.url("/inventory/ABC123/WH1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let record: serde_json::Value = res.json().await.unwrap();
    assert_eq!(record["available"], 70);
    assert_eq!(record["holds"], json!([]));

    // Second execution is a not-found, never a double consume.
    let res = client
        .post(server.url("/execute_hold"))
        .json(&json!({ "item_id": "ABC123", "warehouse_id": "WH1", "hold_id": hold_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = place_hold(&client, &server, "ABC123", "WH1", 80).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
}

#[tokio::test]
async fn snapshot_defaults_to_now_and_respects_cutoff() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let before_seed = (t0() - ChronoDuration::seconds(1)).to_rfc3339();
    assert_eq!(
        snapshot(&client, &server, Some(&before_seed)).await,
        json!({ "ABC123:WH1": 0, "DEF456:WH2": 0 })
    );
    assert_eq!(
        snapshot(&client, &server, Some("2023-10-01T15:09:59Z")).await,
        json!({ "ABC123:WH1": 100, "DEF456:WH2": 200 })
    );

    place_hold(&client, &server, "DEF456", "WH2", 50).await;
    assert_eq!(
        snapshot(&client, &server, None).await,
        json!({ "ABC123:WH1": 100, "DEF456:WH2": 150 })
    );

    let res = client
        .get(server.url("/inventory_snapshot"))
        .query(&[("at", "yesterday")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_timestamp");
}

#[tokio::test]
async fn error_statuses_follow_error_kinds() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = place_hold(&client, &server, "ABC123", "WH9", 1).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = place_hold(&client, &server, "ABC123", "WH1", 0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = client
        .post(server.url("/execute_hold"))
        .json(&json!({ "item_id": "ABC123", "warehouse_id": "WH1", "hold_id": "not-a-uuid" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(server.url("/inventory/NOPE/WH1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(server.service.record("ABC123", "WH1").unwrap().available, 100);
}

async fn assert_invalid_body(res: reqwest::Response) {
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request_body");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Negative amounts do not deserialize into an unsigned count.
    let negative = client
        .post(server.url("/place_hold"))
        .json(&json!({ "item_id": "ABC123", "warehouse_id": "WH1", "amount": -5 }))
        .send()
        .await
        .unwrap();
    assert_invalid_body(negative).await;

    let missing_field = client
        .post(server.url("/place_hold"))
        .json(&json!({ "item_id": "ABC123", "warehouse_id": "WH1" }))
        .send()
        .await
        .unwrap();
    assert_invalid_body(missing_field).await;

    let syntax = client
        .post(server.url("/place_hold"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_invalid_body(syntax).await;

    let no_content_type = client
        .post(server.url("/place_hold"))
        .body(r#"{"item_id":"ABC123","warehouse_id":"WH1","amount":1}"#)
        .send()
        .await
        .unwrap();
    assert_invalid_body(no_content_type).await;

    let execute_missing_hold = client
        .post(server.url("/execute_hold"))
        .json(&json!({ "item_id": "ABC123", "warehouse_id": "WH1" }))
        .send()
        .await
        .unwrap();
    assert_invalid_body(execute_missing_hold).await;

    assert_eq!(server.service.record("ABC123", "WH1").unwrap().available, 100);
    assert_eq!(server.service.event_count(), 2);
}

#[tokio::test]
async fn expired_holds_come_back_through_the_api() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = place_hold(&client, &server, "ABC123", "WH1", 40).await;
    assert_eq!(res.status(), StatusCode::OK);

    server.clock.advance(ChronoDuration::minutes(16));
    let report = server
        .service
        .release_expired_holds(std::time::Duration::from_secs(15 * 60));
    assert_eq!(report.holds_released, 1);

    assert_eq!(
        snapshot(&client, &server, None).await,
        json!({ "ABC123:WH1": 100, "DEF456:WH2": 200 })
    );
}

#[tokio::test]
async fn sweeper_runs_beside_the_server_and_stops_cleanly() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = place_hold(&client, &server, "ABC123", "WH1", 40).await;
    assert_eq!(res.status(), StatusCode::OK);
    server.clock.advance(ChronoDuration::minutes(2));

    let sweeper = ExpirySweeper::default()
        .with_interval(std::time::Duration::from_millis(20))
        .with_hold_ttl(std::time::Duration::from_secs(60))
        .spawn("test-api-sweeper", server.service.clone())
        .unwrap();

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        let snap = snapshot(&client, &server, None).await;
        if snap["ABC123:WH1"] == 100 {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "hold was never released: {snap}");
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    stop_sweeper(sweeper).await.unwrap();

    // Server keeps answering after the sweeper is gone.
    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
