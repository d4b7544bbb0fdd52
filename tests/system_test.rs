//! End-to-end behaviour with both remote adapters unreachable.

use std::sync::Arc;
use std::time::Duration;

use super_tools_controller::{AgentRouter, KeywordClassifier};
use super_tools_core::{
    traits::{IntentClassifier, ToolRegistry},
    types::{
        CorrelationId, GetMetricsRequest, Intent, Message, RoutingContext, SearchIncidentsRequest,
        UpdateIncidentRequest, DEFAULT_RESOLUTION, STATUS_RESOLVED,
    },
};
use super_tools_skills::{
    create_broker_registry, HttpIncidentAdapter, HttpObservabilityAdapter, ToolBroker,
};

/// Nothing listens on port 1.
const DEAD_ADAPTER: &str = "http://127.0.0.1:1";

fn offline_broker() -> Arc<ToolBroker> {
    let timeout = Duration::from_millis(500);
    Arc::new(
        ToolBroker::new(
            Arc::new(HttpObservabilityAdapter::new(DEAD_ADAPTER, timeout).unwrap()),
            Arc::new(HttpIncidentAdapter::new(DEAD_ADAPTER, timeout).unwrap()),
        )
        .with_timeout(timeout),
    )
}

#[test]
fn test_classification_is_total_and_ordered() {
    let classifier = KeywordClassifier::new();
    let samples = [
        "",
        "cpu",
        "ticket",
        "hello",
        "zzz",
        "disk incident",
        "status",
        "Ünïcödé ✓",
    ];

    for text in samples {
        assert!(Intent::ALL.contains(&classifier.classify(text)));
    }
    assert_eq!(classifier.classify("memory ticket"), Intent::Observability);
    assert_eq!(classifier.classify("performance issue"), Intent::Observability);
}

#[tokio::test]
async fn test_route_unknown_returns_general_capabilities() {
    let router = AgentRouter::with_broker(offline_broker());
    let response = router
        .route(&Message::text("unknown gibberish"), &RoutingContext::default())
        .await;

    assert!(response.success);
    assert_eq!(response.get_str("intent"), Some("general"));
}

#[tokio::test]
async fn test_create_incident_tool_falls_back() {
    let registry = create_broker_registry(offline_broker()).await.unwrap();
    let output = registry
        .execute(
            "itsm_create_incident",
            serde_json::json!({
                "title": "Disk full",
                "description": "The disk on server-03 is full",
                "priority": "High",
                "category": "Infrastructure",
                "requester": "ops@company.com"
            }),
            &CorrelationId::new(),
        )
        .await
        .unwrap();

    assert!(output.success);
    let data = output.data.unwrap();
    assert_eq!(data["provenance"], "fallback");
    assert!(!data["result"]["incident_id"].as_str().unwrap().is_empty());
    assert_eq!(data["result"]["status"], "New");
}

#[tokio::test]
async fn test_resolve_without_resolution_is_auto_filled() {
    let broker = offline_broker();
    let request = UpdateIncidentRequest::new("INC0001").with_status(STATUS_RESOLVED);
    let result = broker
        .update_incident(&request, &CorrelationId::new())
        .await
        .unwrap();

    assert!(result.is_fallback());
    assert_eq!(result.payload.resolution.as_deref(), Some(DEFAULT_RESOLUTION));
}

#[tokio::test]
async fn test_unsupported_metric_is_not_found() {
    let broker = offline_broker();
    let err = broker
        .get_metrics(
            &GetMetricsRequest::new("server-01", "gpu"),
            &CorrelationId::new(),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fallback_search_is_idempotent() {
    let broker = offline_broker();
    let request = SearchIncidentsRequest::new("server");

    let first = broker
        .search_incidents(&request, &CorrelationId::new())
        .await
        .unwrap();
    let second = broker
        .search_incidents(&request, &CorrelationId::new())
        .await
        .unwrap();

    assert_eq!(first.payload, second.payload);
    assert_eq!(first.payload.total_count, 1);
}

#[tokio::test]
async fn test_concurrent_cycles_each_get_one_response() {
    let router = Arc::new(AgentRouter::with_broker(offline_broker()));
    let texts = ["cpu", "memory of server-02", "open ticket", "hi", "???"];

    let responses = futures::future::join_all(texts.iter().map(|text| {
        let router = router.clone();
        async move {
            router
                .route(&Message::text(*text), &RoutingContext::default())
                .await
        }
    }))
    .await;

    assert_eq!(responses.len(), texts.len());
    assert!(responses.iter().all(|r| !r.message.is_empty()));
}
