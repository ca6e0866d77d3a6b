use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot()
use visitor_log::{
    build_router, AppState, DataStorage, HostTelemetryCollector, LogRecord, MemoryStorage,
    StorageError, TelemetryOptions, ValidationMode,
};

struct UnreachableStorage;

#[async_trait]
impl DataStorage<LogRecord> for UnreachableStorage {
    async fn store(&self, _data: &LogRecord) -> Result<String, StorageError> {
        Err(StorageError::Write("server selection timeout".to_string()))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("server selection timeout".to_string()))
    }
}

struct PanickingStorage;

#[async_trait]
impl DataStorage<LogRecord> for PanickingStorage {
    async fn store(&self, _data: &LogRecord) -> Result<String, StorageError> {
        panic!("storage exploded")
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

fn app(
    storage: Arc<dyn DataStorage<LogRecord>>,
    mode: ValidationMode,
    static_dir: &Path,
) -> Router {
    let telemetry = HostTelemetryCollector::new(TelemetryOptions::default(), None);
    build_router(AppState::new(storage, telemetry, mode, static_dir.to_path_buf()))
}

fn full_payload() -> Value {
    json!({
        "timestamp": "2024-05-01T10:00:00Z",
        "browser_language": "en-US",
        "screen_width": 1920,
        "screen_height": 1080,
        "timezone": "Europe/Berlin",
        "battery_level": 0.82,
        "ip": "203.0.113.7",
        "latitude": 52.52,
        "longitude": 13.405,
    })
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .uri("/api/log_user_details")
        .method("POST")
        .header("Content-Type", "application/json")
        .header("User-Agent", "integration-test/1.0")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn complete_payload_is_stored_with_host_telemetry() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let app = app(storage.clone(), ValidationMode::Strict, dir.path());

    let response = app.oneshot(post_json(&full_payload())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Data sent successfully!");
    let id = body["id"].as_str().unwrap();

    assert_eq!(storage.len(), 1);
    let document = storage.get(id).unwrap();
    for (field, value) in full_payload().as_object().unwrap() {
        assert_eq!(&document[field], value, "field {field}");
    }
    assert_eq!(document["user_agent"], "integration-test/1.0");
    for group in ["system_info", "cpu_info", "memory_info", "disk_info"] {
        assert!(document[group].is_object(), "missing telemetry group {group}");
    }
    assert!(document["session_id"].is_string());
    assert!(document["logged_at"].is_string());
}

#[tokio::test]
async fn missing_field_is_rejected_in_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let app = app(storage.clone(), ValidationMode::Strict, dir.path());

    let mut payload = full_payload();
    payload.as_object_mut().unwrap().remove("timezone");

    let response = app.oneshot(post_json(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Validation error: Missing required field: timezone"
    );
    assert!(storage.is_empty());
}

#[tokio::test]
async fn missing_field_is_stored_as_null_in_lenient_mode() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let app = app(storage.clone(), ValidationMode::Lenient, dir.path());

    let mut payload = full_payload();
    payload.as_object_mut().unwrap().remove("battery_level");

    let response = app.oneshot(post_json(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let documents = storage.documents();
    assert_eq!(documents.len(), 1);
    assert!(documents[0]["battery_level"].is_null());
    assert_eq!(documents[0]["timezone"], "Europe/Berlin");
}

#[tokio::test]
async fn non_json_content_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let app = app(storage.clone(), ValidationMode::Lenient, dir.path());

    let request = Request::builder()
        .uri("/api/log_user_details")
        .method("POST")
        .header("Content-Type", "text/plain")
        .body(Body::from(full_payload().to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Validation error: Request content type must be JSON"
    );
    assert!(storage.is_empty());
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(MemoryStorage::new()), ValidationMode::Strict, dir.path());

    let request = Request::builder()
        .uri("/api/log_user_details")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"timestamp\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Validation error: Malformed JSON body"));
}

#[tokio::test]
async fn unreachable_store_yields_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(UnreachableStorage), ValidationMode::Strict, dir.path());

    let response = app.oneshot(post_json(&full_payload())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error"],
        "Database error: Write operation failed: server selection timeout"
    );
}

#[tokio::test]
async fn repeated_posts_create_independent_documents() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let app = app(storage.clone(), ValidationMode::Strict, dir.path());

    let first = app.clone().oneshot(post_json(&full_payload())).await.unwrap();
    let second = app.oneshot(post_json(&full_payload())).await.unwrap();
    let first_id = json_body(first).await["id"].clone();
    let second_id = json_body(second).await["id"].clone();

    assert_ne!(first_id, second_id);
    let documents = storage.documents();
    assert_eq!(documents.len(), 2);
    assert_ne!(documents[0]["session_id"], documents[1]["session_id"]);
}

#[tokio::test]
async fn index_serves_static_asset() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>hello</h1>").unwrap();
    let app = app(Arc::new(MemoryStorage::new()), ValidationMode::Strict, dir.path());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>hello</h1>");
}

#[tokio::test]
async fn missing_index_yields_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(MemoryStorage::new()), ValidationMode::Strict, dir.path());

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["error"]
        .as_str()
        .unwrap()
        .starts_with("Could not serve index.html"));
}

#[tokio::test]
async fn other_static_files_are_served_under_public() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("script.js"), "console.log(1);").unwrap();
    let app = app(Arc::new(MemoryStorage::new()), ValidationMode::Strict, dir.path());

    let request = Request::builder().uri("/public/script.js").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(MemoryStorage::new()), ValidationMode::Strict, dir.path());

    let request = Request::builder()
        .uri("/api/log_user_details")
        .method("OPTIONS")
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-max-age"], "3600");
}

#[tokio::test]
async fn panicking_store_yields_unexpected_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(PanickingStorage), ValidationMode::Strict, dir.path());

    let response = app.oneshot(post_json(&full_payload())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error"],
        "Unexpected error: storage exploded"
    );
}
