//! Integration tests for the Functor Engine API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Engine-backed routes talk to a fake
//! OpenAI-compatible model on an ephemeral local port.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use functor_engine::{
    BackendType, FunctorEngine, LlmBackendConfig, PromptEngine, create_backend,
};
use functor_graph::GraphService;
use functor_server::router::build_router;
use functor_server::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

fn kingdom() -> Value {
    json!({
        "nodes": [
            {"id": "king", "label": "Ash King", "description": "Ruler of cinders", "type": "person"},
            {"id": "spire", "label": "Crystal Spire", "description": "Source of magic", "type": "place"}
        ],
        "edges": [
            {"source": "king", "target": "spire", "label": "draws", "rule": "The king's power fades far from the spire"},
            {"source": "rebel", "target": "king", "label": "defies", "rule": "Rebels wear red roses"}
        ]
    })
}

async fn state_with_world() -> Arc<AppState> {
    let state = AppState::without_engine();
    state.graph.rebuild(&kingdom()).await.unwrap();
    Arc::new(state)
}

/// Fake model: extraction answers `["king"]`, world requests answer the
/// kingdom, everything else answers a fixed translation.
async fn spawn_model() -> String {
    async fn chat(axum::Json(body): axum::Json<Value>) -> axum::Json<Value> {
        let system = body["messages"][0]["content"].as_str().unwrap_or_default();
        let content = if system.contains("extract key concepts") {
            json!(["the king"]).to_string()
        } else if system.contains("world architect") {
            kingdom().to_string()
        } else {
            String::from("The Ash King strode from his spire.")
        };
        axum::Json(json!({"choices": [{"message": {"content": content}}]}))
    }

    let app = axum::Router::new().route("/v1/chat/completions", post(chat));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}/v1")
}

async fn state_with_engine() -> Arc<AppState> {
    let graph = Arc::new(GraphService::create());
    let backend = create_backend(&LlmBackendConfig {
        backend_type: BackendType::OpenAi,
        api_url: spawn_model().await,
        api_key: "test-key".to_owned(),
        model: "fake-model".to_owned(),
        temperature: 0.7,
    });
    let engine = FunctorEngine::new(
        Arc::clone(&graph),
        backend,
        PromptEngine::builtin().unwrap(),
        Duration::from_secs(5),
    );
    Arc::new(AppState::new(graph, Some(Arc::new(engine))))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_index_returns_html() {
    let app = build_router(state_with_world().await);

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Functor Engine"));
    assert!(html.contains("vis-network"));
    assert!(html.contains("NOT CONFIGURED"));
}

#[tokio::test]
async fn test_get_graph_works_without_engine() {
    let app = build_router(state_with_world().await);

    let response = app
        .oneshot(Request::get("/world/graph").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(
        json["nodes"],
        json!([
            {"id": "king", "label": "Ash King", "title": "Ruler of cinders", "group": "person"},
            {"id": "spire", "label": "Crystal Spire", "title": "Source of magic", "group": "place"},
            {"id": "rebel", "label": "rebel", "group": "unknown"}
        ])
    );
    assert_eq!(
        json["edges"],
        json!([
            {"from": "king", "to": "spire", "label": "draws", "title": "The king's power fades far from the spire"},
            {"from": "rebel", "to": "king", "label": "defies", "title": "Rebels wear red roses"}
        ])
    );
}

#[tokio::test]
async fn test_get_graph_empty_world() {
    let app = build_router(Arc::new(AppState::without_engine()));

    let response = app
        .oneshot(Request::get("/world/graph").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"nodes": [], "edges": []}));
}

#[tokio::test]
async fn test_health_reports_snapshot() {
    let app = build_router(state_with_world().await);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine_available"], false);
    assert_eq!(json["node_count"], 3);
    assert_eq!(json["edge_count"], 2);
    assert!(json["snapshot_id"].is_string());
    assert!(json["built_at"].is_string());
}

#[tokio::test]
async fn test_initialize_without_engine_is_503() {
    let app = build_router(state_with_world().await);

    let response = app
        .oneshot(post_json("/world/initialize", &json!({"config_text": "A realm of ash."})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 503);
    assert!(json["error"].as_str().unwrap().contains("engine not initialized"));
}

#[tokio::test]
async fn test_translate_without_engine_is_503() {
    let state = state_with_world().await;
    let app = build_router(Arc::clone(&state));

    let response = app
        .oneshot(post_json("/translate", &json!({"text": "The king wakes."})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(state.graph.read_snapshot().await.graph.node_count(), 3);
}

#[tokio::test]
async fn test_blank_text_is_422() {
    let app = build_router(state_with_world().await);

    let response = app
        .oneshot(post_json("/translate", &json!({"text": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 422);
}

#[tokio::test]
async fn test_missing_field_returns_error_body() {
    let app = build_router(state_with_world().await);

    let response = app
        .oneshot(post_json("/world/initialize", &json!({"text": "wrong field"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 422);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_initialize_then_translate_with_engine() {
    let state = state_with_engine().await;

    let response = build_router(Arc::clone(&state))
        .oneshot(post_json("/world/initialize", &json!({"config_text": "A realm of ash."})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"status": "initialized", "nodes": 3}));

    let response = build_router(Arc::clone(&state))
        .oneshot(post_json(
            "/translate",
            &json!({"text": "The king left the castle.", "world_id": "default"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["original_text"], "The king left the castle.");
    assert_eq!(json["translated_text"], "The Ash King strode from his spire.");
    assert_eq!(
        json["applied_laws"],
        json!([
            "Concept 'the king' maps to 'king' with laws:\n- draws: The king's power fades far from the spire (-> spire)"
        ])
    );
}
