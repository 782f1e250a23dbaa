use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use ghframes_api::app::{build_app_with, services::AppServices};
use ghframes_store::MemoryStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port over a fresh
        // in-memory store.
        let services = Arc::new(AppServices::over(Arc::new(MemoryStore::new())));
        let app = build_app_with(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_stock(
    client: &reqwest::Client,
    base_url: &str,
    size: &str,
    variant: &str,
    quantity: i64,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/api/stocks", base_url))
        .json(&json!({
            "size": size,
            "variant": variant,
            "price": 1500,
            "quantity": quantity,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn stock_quantity(client: &reqwest::Client, base_url: &str, id: &str) -> i64 {
    let res = client
        .get(format!("{}/api/stocks/{}", base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["quantity"].as_i64().unwrap()
}

fn bill_body(stock_id: &str, quantity: i64) -> serde_json::Value {
    json!({
        "customer_name": "Amira",
        "items": [{
            "stock_item_id": stock_id,
            "size": "8x10",
            "variant": "walnut",
            "quantity": quantity,
            "unit_price": 1500,
        }],
        "total_amount": quantity * 1500,
    })
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn stock_crud_roundtrip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_stock(&client, &srv.base_url, "8x10", "walnut", 10).await;
    let id = created["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/api/stocks", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["size"], "8x10");

    // Patch only the price; quantity must survive.
    let res = client
        .put(format!("{}/api/stocks/{}", srv.base_url, id))
        .json(&json!({ "price": 1800 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let patched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(patched["price"], 1800);
    assert_eq!(patched["quantity"], 10);

    let res = client
        .post(format!("{}/api/stocks/{}/adjust", srv.base_url, id))
        .json(&json!({ "delta": -4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(stock_quantity(&client, &srv.base_url, id).await, 6);

    let res = client
        .delete(format!("{}/api/stocks/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/stocks/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/stocks/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn billing_lifecycle_keeps_stock_consistent() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let stock = create_stock(&client, &srv.base_url, "8x10", "walnut", 10).await;
    let stock_id = stock["id"].as_str().unwrap();

    // Sell 3.
    let res = client
        .post(format!("{}/api/bills", srv.base_url))
        .json(&bill_body(stock_id, 3))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let bill: serde_json::Value = res.json().await.unwrap();
    assert_eq!(bill["invoice_number"], "GHW#001");
    assert_eq!(stock_quantity(&client, &srv.base_url, stock_id).await, 7);

    // Edit down to 2; one unit flows back.
    let bill_id = bill["id"].as_str().unwrap();
    let res = client
        .put(format!("{}/api/bills/{}", srv.base_url, bill_id))
        .json(&bill_body(stock_id, 2))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(stock_quantity(&client, &srv.base_url, stock_id).await, 8);

    // Delete; everything flows back.
    let res = client
        .delete(format!("{}/api/bills/{}", srv.base_url, bill_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(stock_quantity(&client, &srv.base_url, stock_id).await, 10);

    let res = client
        .get(format!("{}/api/bills", srv.base_url))
        .send()
        .await
        .unwrap();
    let bills: Vec<serde_json::Value> = res.json().await.unwrap();
    assert!(bills.is_empty());
}

#[tokio::test]
async fn bill_update_beyond_availability_is_a_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let stock = create_stock(&client, &srv.base_url, "8x10", "walnut", 10).await;
    let stock_id = stock["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/api/bills", srv.base_url))
        .json(&bill_body(stock_id, 3))
        .send()
        .await
        .unwrap();
    let bill: serde_json::Value = res.json().await.unwrap();
    let bill_id = bill["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/bills/{}", srv.base_url, bill_id))
        .json(&bill_body(stock_id, 20))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    // Nothing moved.
    assert_eq!(stock_quantity(&client, &srv.base_url, stock_id).await, 7);
}

#[tokio::test]
async fn bill_against_missing_stock_applies_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/bills", srv.base_url))
        .json(&bill_body("00000000-0000-7000-8000-000000000000", 1))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/bills", srv.base_url))
        .send()
        .await
        .unwrap();
    let bills: Vec<serde_json::Value> = res.json().await.unwrap();
    assert!(bills.is_empty());
}

#[tokio::test]
async fn blank_customer_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let stock = create_stock(&client, &srv.base_url, "8x10", "walnut", 10).await;
    let stock_id = stock["id"].as_str().unwrap();

    let mut body = bill_body(stock_id, 1);
    body["customer_name"] = json!("   ");

    let res = client
        .post(format!("{}/api/bills", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn purchase_log_roundtrip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/purchases", srv.base_url))
        .json(&json!({
            "vendor_name": "Frame Supply Co",
            "product_name": "walnut moulding",
            "quantity": 40,
            "cost": 12000,
            "notes": "monthly restock",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    // Explicit zero is a deliberate write-off; clearing notes with "".
    let res = client
        .put(format!("{}/api/purchases/{}", srv.base_url, id))
        .json(&json!({ "quantity": 0, "notes": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let patched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(patched["quantity"], 0);
    assert!(patched["notes"].is_null());

    let res = client
        .delete(format!("{}/api/purchases/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/api/purchases", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: Vec<serde_json::Value> = res.json().await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn rejects_purchase_with_nonpositive_quantity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/purchases", srv.base_url))
        .json(&json!({
            "vendor_name": "Frame Supply Co",
            "product_name": "walnut moulding",
            "quantity": 0,
            "cost": 12000,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
