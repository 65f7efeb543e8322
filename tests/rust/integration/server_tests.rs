use std::sync::Arc;

use askdb::config::{PipelineConfig, ServerConfig};
use askdb::server::{build_router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::support::{pipeline, FakeStore, ScriptedLlm};

fn app(store: Arc<FakeStore>, llm: Arc<ScriptedLlm>) -> Router {
    let config = ServerConfig::default();
    build_router(Arc::new(AppState {
        pipeline: pipeline(store, llm, PipelineConfig::default()),
        config,
    }))
}

fn ask(body: Value, user_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/ai/process")
        .header("content-type", "application/json");
    if let Some(user_id) = user_id {
        builder = builder
            .header("x-user-id", user_id)
            .header("x-user-email", "ada@example.com");
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app(
        Arc::new(FakeStore::portfolio()),
        Arc::new(ScriptedLlm::new("holdings", "SELECT 1")),
    );
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["service"], "askdb");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_identity_is_401() {
    let store = Arc::new(FakeStore::portfolio());
    let llm = Arc::new(ScriptedLlm::new("holdings", "SELECT 1"));
    let response = app(store.clone(), llm.clone())
        .oneshot(ask(json!({"prompt": "show me my transactions"}), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await, json!({"error": "Not authenticated"}));
    assert!(!store.touched());
    assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn test_blank_prompt_is_400() {
    let response = app(
        Arc::new(FakeStore::portfolio()),
        Arc::new(ScriptedLlm::new("holdings", "SELECT 1")),
    )
    .oneshot(ask(json!({"prompt": "   "}), Some("42")))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Prompt is required");
}

#[tokio::test]
async fn test_unknown_table_is_400() {
    let response = app(
        Arc::new(FakeStore::portfolio()),
        Arc::new(ScriptedLlm::new("portfolio_x", "SELECT 1")),
    )
    .oneshot(ask(json!({"prompt": "what is my net worth"}), Some("42")))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Could not determine relevant data for your query");
    assert!(body["details"].as_str().unwrap().contains("portfolio_x"));
}

#[tokio::test]
async fn test_unsafe_query_is_422() {
    let store = Arc::new(FakeStore::portfolio());
    let response = app(
        store.clone(),
        Arc::new(ScriptedLlm::new("holdings", "DROP TABLE holdings")),
    )
    .oneshot(ask(json!({"prompt": "clean up my holdings"}), Some("42")))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        read_json(response).await["error"],
        "The generated query was rejected as unsafe"
    );
    assert!(store.executed().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_500_with_details() {
    let mut store = FakeStore::portfolio();
    store.fail_execution = Some("Code: 47. Missing columns: 'nope'".to_string());
    let response = app(
        Arc::new(store),
        Arc::new(ScriptedLlm::new("holdings", "SELECT nope FROM holdings")),
    )
    .oneshot(ask(json!({"prompt": "how many shares"}), Some("42")))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Error processing your query");
    assert!(body["details"].as_str().unwrap().contains("Missing columns"));
}

#[tokio::test]
async fn test_success_shape() {
    let store = Arc::new(FakeStore::portfolio().with_result(json!([
        {"company": "A", "shares": 10},
        {"company": "B", "shares": 5}
    ])));
    let response = app(
        store,
        Arc::new(ScriptedLlm::new("holdings", "SELECT company, shares FROM holdings")),
    )
    .oneshot(ask(json!({"prompt": "show me my holdings"}), Some("42")))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["query"], "show me my holdings");
    assert_eq!(body["table_used"], "holdings");
    assert_eq!(body["interpretation"], "Here is what I found.");
    assert_eq!(body["raw_results"][1]["company"], "B");
    assert_eq!(body["graph"], json!({"required": false}));
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/process")
        .header("content-type", "application/json")
        .header("x-user-id", "42")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(
        Arc::new(FakeStore::portfolio()),
        Arc::new(ScriptedLlm::new("holdings", "SELECT 1")),
    )
    .oneshot(request)
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Invalid request body");
}
