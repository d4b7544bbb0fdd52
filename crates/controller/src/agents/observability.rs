//! Observability agent: metrics and server status.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

use super_tools_core::{
    traits::Agent,
    types::{
        AgentResponse, CorrelationId, GetMetricsRequest, Intent, Message, MetricsResult,
        Provenance, RoutingContext, SearchAssetsRequest,
    },
};
use super_tools_skills::broker::{ToolBroker, GET_METRICS, SEARCH_ASSETS};

use super::{error_reply, find_asset_id, tool_reply};

const APOLOGY: &str = "Sorry, something went wrong while querying metrics. Please try again.";

const HINT: &str =
    "I can help with CPU, memory and disk metrics and server status. What do you need to know?";

/// Query that selects the monitored server fleet.
const FLEET_QUERY: &str = "server";

/// What the message asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Cpu,
    Memory,
    Disk,
    Server,
}

impl Topic {
    /// Detection order matters: "server cpu" is a CPU question.
    const KEYWORDS: [(Topic, &'static [&'static str]); 4] = [
        (Topic::Cpu, &["cpu"]),
        (Topic::Memory, &["memory", "memória", "memoria"]),
        (Topic::Disk, &["disk", "disco"]),
        (Topic::Server, &["server", "servidor"]),
    ];

    fn detect(lower: &str) -> Option<Topic> {
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(topic, _)| *topic)
    }

    /// Metric read for this topic. Server status reports CPU load.
    fn metric_type(&self) -> &'static str {
        match self {
            Self::Cpu | Self::Server => "cpu",
            Self::Memory => "memory",
            Self::Disk => "disk",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU usage",
            Self::Memory => "Memory usage",
            Self::Disk => "Disk usage",
            Self::Server => "Server status",
        }
    }
}

fn metric_line(metrics: &MetricsResult) -> String {
    format!(
        "- {}: {}{} ({})",
        metrics.asset_id, metrics.data.usage, metrics.data.unit, metrics.data.status
    )
}

/// Answers metric and server questions through the tool broker.
pub struct ObservabilityAgent {
    broker: Arc<ToolBroker>,
}

impl ObservabilityAgent {
    pub fn new(broker: Arc<ToolBroker>) -> Self {
        Self { broker }
    }

    /// One metric for one named asset. Not-found is reported, not skipped.
    async fn asset_metric(
        &self,
        topic: Topic,
        asset_id: String,
        correlation_id: &CorrelationId,
    ) -> AgentResponse {
        let request = GetMetricsRequest::new(asset_id, topic.metric_type());
        match self.broker.get_metrics(&request, correlation_id).await {
            Ok(sourced) => tool_reply(
                Intent::Observability,
                GET_METRICS,
                sourced.provenance,
                format!("{}\n{}", topic.title(), metric_line(&sourced.payload)),
            )
            .with("asset_id", request.asset_id),
            Err(e) => error_reply(Intent::Observability, GET_METRICS, APOLOGY, &e),
        }
    }

    /// One metric across the fleet. Assets without that metric are skipped.
    async fn fleet_metric(&self, topic: Topic, correlation_id: &CorrelationId) -> AgentResponse {
        let assets = match self
            .broker
            .search_assets(&SearchAssetsRequest::new(FLEET_QUERY), correlation_id)
            .await
        {
            Ok(assets) => assets,
            Err(e) => return error_reply(Intent::Observability, SEARCH_ASSETS, APOLOGY, &e),
        };

        let requests: Vec<GetMetricsRequest> = assets
            .payload
            .assets
            .iter()
            .map(|asset| GetMetricsRequest::new(&asset.id, topic.metric_type()))
            .collect();
        let results = join_all(
            requests
                .iter()
                .map(|request| self.broker.get_metrics(request, correlation_id)),
        )
        .await;

        let mut provenance = assets.provenance;
        let mut lines = Vec::with_capacity(results.len());
        for (request, result) in requests.iter().zip(results) {
            match result {
                Ok(sourced) => {
                    if sourced.is_fallback() {
                        provenance = Provenance::Fallback;
                    }
                    lines.push(metric_line(&sourced.payload));
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(
                        correlation_id = %correlation_id,
                        asset_id = %request.asset_id,
                        metric_type = topic.metric_type(),
                        "Asset has no such metric, skipping"
                    );
                }
                Err(e) => return error_reply(Intent::Observability, GET_METRICS, APOLOGY, &e),
            }
        }

        let message = if lines.is_empty() {
            format!("{}\nNo data available for the monitored servers.", topic.title())
        } else {
            format!("{}\n{}", topic.title(), lines.join("\n"))
        };
        tool_reply(Intent::Observability, GET_METRICS, provenance, message)
    }

    /// Inventory of the monitored servers.
    async fn server_status(&self, correlation_id: &CorrelationId) -> AgentResponse {
        match self
            .broker
            .search_assets(&SearchAssetsRequest::new(FLEET_QUERY), correlation_id)
            .await
        {
            Ok(sourced) => {
                let result = &sourced.payload;
                let mut message = format!("Server status ({} monitored)", result.total);
                for asset in &result.assets {
                    message.push_str(&format!(
                        "\n- {} {}: {}, {}",
                        asset.id, asset.name, asset.environment, asset.location
                    ));
                }
                tool_reply(Intent::Observability, SEARCH_ASSETS, sourced.provenance, message)
            }
            Err(e) => error_reply(Intent::Observability, SEARCH_ASSETS, APOLOGY, &e),
        }
    }
}

#[async_trait]
impl Agent for ObservabilityAgent {
    fn name(&self) -> &str {
        "observability"
    }

    async fn process(&self, message: &Message, context: &RoutingContext) -> AgentResponse {
        let correlation_id = &context.correlation_id;
        let Some(topic) = Topic::detect(&message.lowercase()) else {
            return AgentResponse::ok(HINT).with("intent", Intent::Observability.as_str());
        };
        let target = find_asset_id(&message.text);

        tracing::info!(
            correlation_id = %correlation_id,
            topic = ?topic,
            asset_id = ?target,
            "Processing observability request"
        );

        match (topic, target) {
            (Topic::Server, None) => self.server_status(correlation_id).await,
            (topic, Some(asset_id)) => self.asset_metric(topic, asset_id, correlation_id).await,
            (topic, None) => self.fleet_metric(topic, correlation_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super_tools_core::mocks::{MockBehavior, MockIncidentBackend, MockObservabilityBackend};

    fn agent(observability: MockObservabilityBackend) -> ObservabilityAgent {
        ObservabilityAgent::new(Arc::new(ToolBroker::new(
            Arc::new(observability),
            Arc::new(MockIncidentBackend::healthy()),
        )))
    }

    async fn ask(agent: &ObservabilityAgent, text: &str) -> AgentResponse {
        agent.process(&Message::text(text), &RoutingContext::default()).await
    }

    #[test]
    fn test_topic_order() {
        assert_eq!(Topic::detect("server cpu"), Some(Topic::Cpu));
        assert_eq!(Topic::detect("uso de memória"), Some(Topic::Memory));
        assert_eq!(Topic::detect("disco do servidor"), Some(Topic::Disk));
        assert_eq!(Topic::detect("servidor"), Some(Topic::Server));
        assert_eq!(Topic::detect("latency"), None);
    }

    #[tokio::test]
    async fn test_fleet_cpu_from_fallback() {
        let agent = agent(MockObservabilityBackend::unreachable());
        let response = ask(&agent, "What is the CPU usage?").await;

        assert!(response.success);
        assert!(response.message.starts_with("CPU usage"));
        assert!(response.message.contains("- server-02: 78.9% (critical)"));
        assert_eq!(response.get_str("provenance"), Some("fallback"));
        assert_eq!(response.get_str("tool"), Some(GET_METRICS));
    }

    #[tokio::test]
    async fn test_named_asset_from_remote() {
        let agent = agent(MockObservabilityBackend::healthy());
        let response = ask(&agent, "memory of server-03").await;

        assert!(response.success);
        assert_eq!(response.message, "Memory usage\n- server-03: 12.5% (normal)");
        assert_eq!(response.get_str("provenance"), Some("remote"));
        assert_eq!(response.get_str("asset_id"), Some("server-03"));
    }

    #[tokio::test]
    async fn test_named_asset_not_found() {
        let agent = agent(MockObservabilityBackend::new(MockBehavior::NotFound));
        let response = ask(&agent, "cpu of web-09").await;

        assert!(!response.success);
        assert_eq!(response.data["not_found"], true);
        assert!(response.message.contains("web-09"));
    }

    #[tokio::test]
    async fn test_date_is_not_taken_for_an_asset() {
        let agent = agent(MockObservabilityBackend::unreachable());
        let response = ask(&agent, "cpu usage since 2024-01-15").await;

        assert!(response.success);
        assert!(response.message.starts_with("CPU usage"));
        assert!(response.message.contains("- server-01:"));
        assert!(response.get_str("asset_id").is_none());
        assert!(response.data.get("not_found").is_none());
    }

    #[tokio::test]
    async fn test_first_named_asset_wins() {
        let agent = agent(MockObservabilityBackend::unreachable());
        let response = ask(&agent, "compare cpu of server-01 and server-02").await;

        assert!(response.success);
        assert_eq!(response.get_str("asset_id"), Some("server-01"));
        assert!(response.message.contains("- server-01:"));
        assert!(!response.message.contains("server-02"));
    }

    #[tokio::test]
    async fn test_fleet_skips_assets_without_metric() {
        let agent = agent(MockObservabilityBackend::new(MockBehavior::NotFound));
        let response = ask(&agent, "disk usage please").await;

        assert!(response.success);
        assert!(response.message.contains("No data available"));
    }

    #[tokio::test]
    async fn test_server_status_lists_fleet() {
        let agent = agent(MockObservabilityBackend::unreachable());
        let response = ask(&agent, "how are the servers?").await;

        assert!(response.success);
        assert!(response.message.starts_with("Server status (3 monitored)"));
        assert_eq!(response.get_str("tool"), Some(SEARCH_ASSETS));
    }

    #[tokio::test]
    async fn test_hint_without_topic() {
        let agent = agent(MockObservabilityBackend::healthy());
        let response = ask(&agent, "latency?").await;

        assert!(response.success);
        assert_eq!(response.message, HINT);
        assert!(response.get_str("tool").is_none());
    }
}
