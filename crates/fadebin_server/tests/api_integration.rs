//! Integration tests for the Fadebin HTTP API.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use fadebin_server::{create_app, AppState, Config, PasteStore};
use serde_json::json;

const NOW_HEADER: &str = "x-fadebin-now";

fn now_header(value: impl ToString) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(NOW_HEADER),
        HeaderValue::from_str(&value.to_string()).unwrap(),
    )
}

fn test_config() -> Config {
    Config {
        port: 0, // Let OS assign port
        store_url: None,
        store_token: None,
        max_paste_size: 10 * 1024 * 1024,
        test_mode: true,
    }
}

fn setup_test_server() -> TestServer {
    let state = AppState::new(test_config(), PasteStore::in_memory());
    let app = create_app(state, false);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_paste_share_lifecycle() {
    let server = setup_test_server();

    let create_response = server
        .post("/api/paste")
        .json(&json!({
            "content": "Hello, World!",
            "max_views": 2
        }))
        .await;
    assert_eq!(create_response.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = create_response.json();
    let paste_id = created["id"].as_str().unwrap();
    assert_eq!(created["max_views"], 2);
    assert!(created["expires_at"].is_null());

    // The share-page read does not consume the budget.
    let meta_response = server.get(&format!("/api/paste/{}/meta", paste_id)).await;
    assert_eq!(meta_response.status_code(), StatusCode::OK);
    let meta: serde_json::Value = meta_response.json();
    assert_eq!(meta["content"], "Hello, World!");
    assert_eq!(meta["remaining_views"], 2);

    // Counted reads drain the budget one by one.
    let first = server.get(&format!("/api/paste/{}", paste_id)).await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first: serde_json::Value = first.json();
    assert_eq!(first["content"], "Hello, World!");
    assert_eq!(first["remaining_views"], 1);

    let second = server.get(&format!("/api/paste/{}", paste_id)).await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let second: serde_json::Value = second.json();
    assert_eq!(second["remaining_views"], 0);

    // The terminal view removed the paste for every read path.
    let drained = server.get(&format!("/api/paste/{}", paste_id)).await;
    assert_eq!(drained.status_code(), StatusCode::NOT_FOUND);
    let meta_after = server.get(&format!("/api/paste/{}/meta", paste_id)).await;
    assert_eq!(meta_after.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validation_errors_name_the_offending_field() {
    let server = setup_test_server();

    let cases = [
        (json!({}), "content"),
        (json!({ "content": "" }), "content"),
        (json!({ "content": "   " }), "content"),
        (json!({ "content": 123 }), "content"),
        (json!({ "content": "x", "ttl_seconds": "60" }), "ttl_seconds"),
        (json!({ "content": "x", "ttl_seconds": 1.5 }), "ttl_seconds"),
        (json!({ "content": "x", "ttl_seconds": 0 }), "ttl_seconds"),
        (json!({ "content": "x", "ttl_seconds": 31536001 }), "ttl_seconds"),
        (json!({ "content": "x", "max_views": 0 }), "max_views"),
        (json!({ "content": "x", "max_views": "3" }), "max_views"),
    ];

    for (body, field) in cases {
        let response = server.post("/api/paste").json(&body).await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "body: {}",
            body
        );
        let payload: serde_json::Value = response.json();
        assert_eq!(payload["field"], field, "body: {}", body);
        assert!(payload["error"].as_str().unwrap().contains(field));
    }

    // The upper bounds themselves are accepted.
    let response = server
        .post("/api/paste")
        .json(&json!({ "content": "x", "ttl_seconds": 31536000, "max_views": 1000000 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_ttl_expiry_honors_the_time_override_in_test_mode() {
    let server = setup_test_server();
    let t0: i64 = 1_700_000_000_000;

    let (name, value) = now_header(t0);
    let created = server
        .post("/api/paste")
        .add_header(name, value)
        .json(&json!({ "content": "short lived", "ttl_seconds": 60 }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = created.json();
    let paste_id = created["id"].as_str().unwrap();
    assert_eq!(created["created_at"], t0);
    let expiry = t0 + 60_000;

    let (name, value) = now_header(expiry - 1);
    let before = server
        .get(&format!("/api/paste/{}", paste_id))
        .add_header(name, value)
        .await;
    assert_eq!(before.status_code(), StatusCode::OK);

    // The boundary is inclusive: the record dies at its expiry instant.
    let (name, value) = now_header(expiry);
    let at_boundary = server
        .get(&format!("/api/paste/{}", paste_id))
        .add_header(name, value)
        .await;
    assert_eq!(at_boundary.status_code(), StatusCode::NOT_FOUND);

    // And it stays gone even for earlier timestamps afterwards.
    let (name, value) = now_header(t0);
    let after = server
        .get(&format!("/api/paste/{}/meta", paste_id))
        .add_header(name, value)
        .await;
    assert_eq!(after.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_and_implausible_ids_are_not_found() {
    let server = setup_test_server();

    let unknown = server.get("/api/paste/zzzzzzzzzz").await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    let unknown_body: serde_json::Value = unknown.json();
    assert_eq!(unknown_body["error"], "Not found");

    let over_length = "x".repeat(101);
    let implausible = server.get(&format!("/api/paste/{}", over_length)).await;
    assert_eq!(implausible.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_override_header_falls_back_to_wall_clock() {
    let server = setup_test_server();

    let (name, value) = now_header("not-a-number");
    let created = server
        .post("/api/paste")
        .add_header(name, value)
        .json(&json!({ "content": "still works" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = created.json();
    // Wall clock produced a plausible recent timestamp, not zero.
    assert!(created["created_at"].as_i64().unwrap() > 1_600_000_000_000);
}

#[tokio::test]
async fn test_healthz_reports_the_selected_store() {
    let server = setup_test_server();

    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}
