//! Router behaviour over the real classifier, agents and broker.

use std::sync::Arc;

use super_tools_controller::{agents::general::CAPABILITIES, AgentRouter};
use super_tools_core::{
    mocks::{MockIncidentBackend, MockObservabilityBackend},
    types::{CorrelationId, Intent, Message, RoutingContext},
};
use super_tools_skills::ToolBroker;

fn router(
    observability: Arc<MockObservabilityBackend>,
    incidents: Arc<MockIncidentBackend>,
) -> AgentRouter {
    AgentRouter::with_broker(Arc::new(ToolBroker::new(observability, incidents)))
}

fn offline_router() -> AgentRouter {
    router(
        Arc::new(MockObservabilityBackend::unreachable()),
        Arc::new(MockIncidentBackend::unreachable()),
    )
}

#[tokio::test]
async fn test_unknown_text_gets_capabilities() {
    let router = offline_router();
    let (intent, response) = router
        .dispatch(&Message::text("unknown gibberish"), &RoutingContext::default())
        .await;

    assert_eq!(intent, Intent::Unknown);
    assert!(response.success);
    assert_eq!(response.message, CAPABILITIES);
}

#[tokio::test]
async fn test_mixed_domains_go_to_observability() {
    let router = offline_router();
    let (intent, response) = router
        .dispatch(
            &Message::text("open an incident about server-02 cpu"),
            &RoutingContext::default(),
        )
        .await;

    assert_eq!(intent, Intent::Observability);
    assert_eq!(response.get_str("intent"), Some("observability"));
    assert!(response.message.contains("server-02: 78.9%"));
}

#[tokio::test]
async fn test_incident_created_while_adapter_down() {
    let router = offline_router();
    let response = router
        .route(
            &Message::text("Abrir incidente: VPN fora do ar").with_user("joao"),
            &RoutingContext::default(),
        )
        .await;

    assert!(response.success);
    assert_eq!(response.get_str("intent"), Some("itsm"));
    assert_eq!(response.get_str("provenance"), Some("fallback"));
    assert!(!response.get_str("incident_id").unwrap_or_default().is_empty());
    assert!(response.message.contains("Status: New"));
}

#[tokio::test]
async fn test_correlation_id_reaches_adapter() {
    let observability = Arc::new(MockObservabilityBackend::healthy());
    let incidents = Arc::new(MockIncidentBackend::healthy());
    let router = router(observability.clone(), incidents.clone());

    let correlation_id = CorrelationId::from_string("corr-123");
    router
        .route(
            &Message::text("memory of server-01"),
            &RoutingContext::new(correlation_id),
        )
        .await;

    assert_eq!(observability.correlation_ids(), vec!["corr-123".to_string()]);
    assert_eq!(incidents.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_routing() {
    let router = Arc::new(offline_router());
    let texts = ["cpu", "hello", "open a ticket", "qwerty", "disk of db-01"];

    let handles: Vec<_> = texts
        .iter()
        .map(|text| {
            let router = router.clone();
            let message = Message::text(*text);
            tokio::spawn(async move { router.route(&message, &RoutingContext::default()).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap();
        assert!(!response.message.is_empty());
    }
}

#[tokio::test]
async fn test_two_named_assets_answer_for_the_first() {
    let router = offline_router();
    let (intent, response) = router
        .dispatch(
            &Message::text("compare cpu of server-01 and server-02"),
            &RoutingContext::default(),
        )
        .await;

    assert_eq!(intent, Intent::Observability);
    assert!(response.success);
    assert_eq!(response.get_str("asset_id"), Some("server-01"));
    assert!(response.message.contains("server-01: 45.2%"));
    assert!(!response.message.contains("server-02"));
}

#[tokio::test]
async fn test_date_in_metric_question_shows_fleet() {
    let router = offline_router();
    let response = router
        .route(
            &Message::text("cpu usage since 2024-01-15"),
            &RoutingContext::default(),
        )
        .await;

    assert!(response.success);
    assert!(response.get_str("asset_id").is_none());
    assert!(response.message.contains("server-02: 78.9%"));
}
