use std::str::FromStr;
use std::sync::Arc;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use catalog_infra::InMemoryProductStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) over the in-memory store, bound to
        // an ephemeral port.
        let store = Arc::new(InMemoryProductStore::new());
        let app = catalog_api::app::build_app(store);
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

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn fedora() -> Value {
    json!({
        "name": "Fedora",
        "description": "A red hat",
        "price": "12.50",
        "available": true,
        "category": "CLOTHS",
    })
}

fn sample(name: &str, category: &str, available: bool) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "price": "9.99",
        "available": available,
        "category": category,
    })
}

async fn create(client: &reqwest::Client, srv: &TestServer, payload: &Value) -> Value {
    let res = client
        .post(srv.url("/products"))
        .json(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED, "could not create test product");
    res.json().await.unwrap()
}

async fn product_count(client: &reqwest::Client, srv: &TestServer) -> usize {
    let res = client.get(srv.url("/products")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json::<Vec<Value>>().await.unwrap().len()
}

#[tokio::test]
async fn index_serves_the_admin_page() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Product Catalog Administration"));
}

#[tokio::test]
async fn health_reports_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "OK");
    assert_eq!(body["status"], 200);
}

#[tokio::test]
async fn create_returns_record_and_location() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/products"))
        .json(&fedora())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let location = res
        .headers()
        .get("Location")
        .expect("Location header missing")
        .to_str()
        .unwrap()
        .to_string();

    let created: Value = res.json().await.unwrap();
    assert_eq!(created["name"], "Fedora");
    assert_eq!(created["description"], "A red hat");
    assert_eq!(
        Decimal::from_str(created["price"].as_str().unwrap()).unwrap(),
        Decimal::from_str("12.50").unwrap()
    );
    assert_eq!(created["price"], "12.50");
    assert_eq!(created["available"], true);
    assert_eq!(created["category"], "CLOTHS");
    assert!(created["id"].is_i64());

    // The Location URL must serve back the same record.
    let res = client.get(srv.url(&location)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_without_name_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut payload = fedora();
    payload.as_object_mut().unwrap().remove("name");
    let res = client
        .post(srv.url("/products"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn create_with_unknown_category_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/products"))
        .json(&sample("Widget", "GADGETS", true))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("GADGETS"));
}

#[tokio::test]
async fn create_without_content_type_is_unsupported() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/products"))
        .body("bad data")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn create_with_wrong_content_type_is_unsupported() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/products"))
        .header("Content-Type", "text/plain")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Content-Type must be application/json");
}

#[tokio::test]
async fn get_product_round_trips() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = create(&client, &srv, &fedora()).await;
    let id = created["id"].as_i64().unwrap();

    let res = client
        .get(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    // Reads are idempotent absent intervening writes.
    let again: Value = client
        .get(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(again, fetched);
}

#[tokio::test]
async fn get_missing_product_is_not_found() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/products/0")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No product found with id 0"));
}

#[tokio::test]
async fn update_replaces_description_and_keeps_the_rest() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let mut created = create(&client, &srv, &fedora()).await;
    let id = created["id"].as_i64().unwrap();

    created["description"] = json!("A blue hat");
    let res = client
        .put(srv.url(&format!("/products/{id}")))
        .json(&created)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["description"], "A blue hat");
    assert_eq!(updated["id"], json!(id));
    assert_eq!(updated["name"], "Fedora");
    assert_eq!(updated["price"], "12.50");

    let fetched: Value = client
        .get(srv.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(srv.url("/products/0"))
        .json(&fedora())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No product found with id 0"));
}

#[tokio::test]
async fn delete_removes_exactly_one_product() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let mut ids = Vec::new();
    for i in 0..5 {
        let created = create(&client, &srv, &sample(&format!("p{i}"), "FOOD", true)).await;
        ids.push(created["id"].as_i64().unwrap());
    }

    let before = product_count(&client, &srv).await;
    let res = client
        .delete(srv.url(&format!("/products/{}", ids[0])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());
    assert_eq!(product_count(&client, &srv).await, before - 1);

    // And the record is really gone.
    let res = client
        .get(srv.url(&format!("/products/{}", ids[0])))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_product_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.delete(srv.url("/products/0")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No product found with id 0"));
}

#[tokio::test]
async fn list_returns_every_product() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    for i in 0..5 {
        create(&client, &srv, &sample(&format!("p{i}"), "TOOLS", true)).await;
    }
    assert_eq!(product_count(&client, &srv).await, 5);
}

#[tokio::test]
async fn list_filters_by_name() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &srv, &sample("Hammer", "TOOLS", true)).await;
    create(&client, &srv, &sample("Hammer", "TOOLS", false)).await;
    create(&client, &srv, &sample("Wrench", "TOOLS", true)).await;

    let res = client
        .get(srv.url("/products?name=Hammer"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Vec<Value> = res.json().await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p["name"] == "Hammer"));
}

#[tokio::test]
async fn list_filters_by_category() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &srv, &sample("Fedora", "CLOTHS", true)).await;
    create(&client, &srv, &sample("Apple", "FOOD", true)).await;
    create(&client, &srv, &sample("Banana", "FOOD", false)).await;

    let res = client
        .get(srv.url("/products?category=FOOD"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Vec<Value> = res.json().await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p["category"] == "FOOD"));
}

#[tokio::test]
async fn list_filters_by_availability() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    for i in 0..10 {
        create(&client, &srv, &sample(&format!("p{i}"), "HOUSEWARES", i % 3 == 0)).await;
    }

    let res = client
        .get(srv.url("/products?available=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Vec<Value> = res.json().await.unwrap();
    assert_eq!(found.len(), 4);
    assert!(found.iter().all(|p| p["available"] == true));
}

#[tokio::test]
async fn list_filter_precedence_is_name_then_category_then_availability() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &srv, &sample("Hammer", "TOOLS", true)).await;
    create(&client, &srv, &sample("Apple", "FOOD", false)).await;

    // All three parameters supplied: only `name` is honored, so the FOOD and
    // available=false parameters must be ignored.
    let res = client
        .get(srv.url("/products?name=Hammer&category=FOOD&available=false"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Vec<Value> = res.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Hammer");

    // Without `name`, `category` outranks `available`.
    let res = client
        .get(srv.url("/products?category=FOOD&available=true"))
        .send()
        .await
        .unwrap();
    let found: Vec<Value> = res.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Apple");
}

#[tokio::test]
async fn list_with_unknown_category_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &srv, &sample("Hammer", "TOOLS", true)).await;

    let res = client
        .get(srv.url("/products?category=GADGETS"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("GADGETS"));
}

#[tokio::test]
async fn list_with_malformed_available_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/products?available=maybe"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
