use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use super_tools_controller::AgentRouter;
use super_tools_core::mocks::{MockIncidentBackend, MockObservabilityBackend};
use super_tools_gateway::{GatewayConfig, GatewayServer, MessageResponse};
use super_tools_governance::BearerValidator;
use super_tools_skills::{create_broker_registry, ToolBroker};

const TOKEN: &str = "Bearer test-token-gateway";

async fn app() -> Router {
    let broker = Arc::new(ToolBroker::new(
        Arc::new(MockObservabilityBackend::unreachable()),
        Arc::new(MockIncidentBackend::unreachable()),
    ));
    let registry = create_broker_registry(broker.clone()).await.unwrap();
    let server = GatewayServer::new(
        GatewayConfig::default(),
        Arc::new(AgentRouter::with_broker(broker)),
        Arc::new(registry),
        Arc::new(BearerValidator::new(Secret::new("test-token-".to_string()))),
    );
    server.build_router()
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .await
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-correlation-id"));

    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "channel-gateway");
}

#[tokio::test]
async fn test_correlation_id_is_echoed() {
    let response = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Correlation-ID", "corr-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-correlation-id"], "corr-42");
}

#[tokio::test]
async fn test_message_routed_to_itsm() {
    let response = app()
        .await
        .oneshot(post(
            "/api/v1/messages",
            Some(TOKEN),
            json!({"message": "Abrir incidente para problema no banco", "user_id": "ana"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let reply: MessageResponse = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(reply.status, "success");
    assert_eq!(reply.intent, "itsm");
    assert!(reply.response.contains("INC9999"));
    assert!(!reply.message_id.is_empty());
}

#[tokio::test]
async fn test_unknown_message_gets_capabilities() {
    let response = app()
        .await
        .oneshot(post("/api/v1/messages", Some(TOKEN), json!({"message": "qwerty"})))
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["intent"], "unknown");
    assert!(json["response"].as_str().unwrap().contains("I can help with"));
}

#[tokio::test]
async fn test_message_requires_bearer() {
    let response = app()
        .await
        .oneshot(post("/api/v1/messages", None, json!({"message": "cpu"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app()
        .await
        .oneshot(post(
            "/api/v1/messages",
            Some("Bearer prod-token-1"),
            json!({"message": "cpu"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["code"], "UNAUTHORIZED");
}

fn post_raw(uri: &str, token: Option<&str>, body: &'static str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_malformed_body_without_bearer_is_unauthorized() {
    let response = app()
        .await
        .oneshot(post_raw("/api/v1/messages", None, "{not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["code"], "UNAUTHORIZED");

    let response = app()
        .await
        .oneshot(post_raw("/api/v1/messages", None, r#"{"text": "cpu"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_with_bearer_is_bad_request() {
    let response = app()
        .await
        .oneshot(post_raw("/api/v1/messages", Some(TOKEN), "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_blank_message_rejected() {
    let response = app()
        .await
        .oneshot(post("/api/v1/messages", Some(TOKEN), json!({"message": "   "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_list_tools() {
    let response = app()
        .await
        .oneshot(Request::builder().uri("/api/v1/tools").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_invoke_tool() {
    let response = app()
        .await
        .oneshot(post(
            "/api/v1/tools/itsm_update_incident",
            Some(TOKEN),
            json!({"incident_id": "INC0001", "status": "Resolved"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["provenance"], "fallback");
    assert_eq!(json["data"]["result"]["resolution"], "Resolved via API");
}

#[tokio::test]
async fn test_invoke_unknown_tool() {
    let response = app()
        .await
        .oneshot(post("/api/v1/tools/nope", Some(TOKEN), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invoke_tool_with_invalid_arguments() {
    let response = app()
        .await
        .oneshot(post(
            "/api/v1/tools/observ_search_assets",
            Some(TOKEN),
            json!({"query": "server", "limit": 0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
