//! Broker operations exposed as named JSON tools.

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super_tools_core::{
    traits::Tool,
    types::{
        CorrelationId, CreateIncidentRequest, GetMetricsRequest, HealthCheckRequest,
        SearchAssetsRequest, SearchIncidentsRequest, Sourced, ToolOutput, UpdateIncidentRequest,
    },
    Error, Result,
};

use crate::broker::{
    ToolBroker, CREATE_INCIDENT, GET_METRICS, HEALTH_CHECK, SEARCH_ASSETS, SEARCH_INCIDENTS,
    UPDATE_INCIDENT,
};

/// Which broker operation a [`BrokerTool`] forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerOperation {
    SearchAssets,
    GetMetrics,
    SearchIncidents,
    CreateIncident,
    UpdateIncident,
    HealthCheck,
}

impl BrokerOperation {
    pub const ALL: [BrokerOperation; 6] = [
        Self::SearchAssets,
        Self::GetMetrics,
        Self::SearchIncidents,
        Self::CreateIncident,
        Self::UpdateIncident,
        Self::HealthCheck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchAssets => SEARCH_ASSETS,
            Self::GetMetrics => GET_METRICS,
            Self::SearchIncidents => SEARCH_INCIDENTS,
            Self::CreateIncident => CREATE_INCIDENT,
            Self::UpdateIncident => UPDATE_INCIDENT,
            Self::HealthCheck => HEALTH_CHECK,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::SearchAssets => "Search for assets in the observability system",
            Self::GetMetrics => "Get metrics for a specific asset",
            Self::SearchIncidents => "Search for incidents in the ITSM system",
            Self::CreateIncident => "Create a new incident in the ITSM system",
            Self::UpdateIncident => "Update an existing incident in the ITSM system",
            Self::HealthCheck => "Check the health of the tool broker and its adapters",
        }
    }

    fn schema(&self) -> Value {
        fn of<T: JsonSchema>() -> Value {
            serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
        }
        match self {
            Self::SearchAssets => of::<SearchAssetsRequest>(),
            Self::GetMetrics => of::<GetMetricsRequest>(),
            Self::SearchIncidents => of::<SearchIncidentsRequest>(),
            Self::CreateIncident => of::<CreateIncidentRequest>(),
            Self::UpdateIncident => of::<UpdateIncidentRequest>(),
            Self::HealthCheck => of::<HealthCheckRequest>(),
        }
    }
}

/// A broker operation callable by name with JSON arguments.
pub struct BrokerTool {
    broker: Arc<ToolBroker>,
    operation: BrokerOperation,
}

impl BrokerTool {
    pub fn new(broker: Arc<ToolBroker>, operation: BrokerOperation) -> Self {
        Self { broker, operation }
    }

    fn parse<T: DeserializeOwned>(&self, args: Value) -> Result<T> {
        // Tools without required fields may be called with no body at all.
        let args = if args.is_null() { json!({}) } else { args };
        serde_json::from_value(args).map_err(|e| {
            Error::invalid_request(format!("invalid arguments for {}: {}", self.operation.name(), e))
        })
    }
}

/// Every broker operation as a boxed tool, ready for a registry.
pub fn broker_tools(broker: Arc<ToolBroker>) -> Vec<Box<dyn Tool>> {
    BrokerOperation::ALL
        .into_iter()
        .map(|op| Box::new(BrokerTool::new(broker.clone(), op)) as Box<dyn Tool>)
        .collect()
}

fn output<T: Serialize>(summary: String, sourced: Sourced<T>) -> Result<ToolOutput> {
    let sourced = sourced.map(|payload| serde_json::to_value(&payload));
    Ok(ToolOutput::text(summary).with_data(json!({
        "provenance": sourced.provenance,
        "result": sourced.payload?,
    })))
}

#[async_trait]
impl Tool for BrokerTool {
    fn name(&self) -> &str {
        self.operation.name()
    }

    fn description(&self) -> &str {
        self.operation.description()
    }

    fn parameters(&self) -> Value {
        self.operation.schema()
    }

    async fn execute(&self, args: Value, correlation_id: &CorrelationId) -> Result<ToolOutput> {
        let broker = &self.broker;
        let result = match self.operation {
            BrokerOperation::SearchAssets => {
                let request: SearchAssetsRequest = self.parse(args)?;
                broker.search_assets(&request, correlation_id).await.and_then(|r| {
                    output(format!("Found {} asset(s) for '{}'", r.payload.total, request.query), r)
                })
            }
            BrokerOperation::GetMetrics => {
                let request: GetMetricsRequest = self.parse(args)?;
                broker.get_metrics(&request, correlation_id).await.and_then(|r| {
                    let summary = format!(
                        "{} {} = {}{} ({})",
                        r.payload.asset_id,
                        r.payload.metric_type,
                        r.payload.data.usage,
                        r.payload.data.unit,
                        r.payload.data.status
                    );
                    output(summary, r)
                })
            }
            BrokerOperation::SearchIncidents => {
                let request: SearchIncidentsRequest = self.parse(args)?;
                broker.search_incidents(&request, correlation_id).await.and_then(|r| {
                    output(format!("Found {} incident(s)", r.payload.total_count), r)
                })
            }
            BrokerOperation::CreateIncident => {
                let request: CreateIncidentRequest = self.parse(args)?;
                broker.create_incident(&request, correlation_id).await.and_then(|r| {
                    output(format!("Incident {} created", r.payload.incident_id), r)
                })
            }
            BrokerOperation::UpdateIncident => {
                let request: UpdateIncidentRequest = self.parse(args)?;
                broker.update_incident(&request, correlation_id).await.and_then(|r| {
                    output(
                        format!("Incident {} is now {}", r.payload.incident_id, r.payload.status),
                        r,
                    )
                })
            }
            BrokerOperation::HealthCheck => {
                let _: HealthCheckRequest = self.parse(args)?;
                let report = broker.health_check(correlation_id).await;
                output(format!("Broker is {}", report.payload.status), report)
            }
        };

        match result {
            Err(e) if e.is_not_found() => {
                Ok(ToolOutput::error(e.to_string()).with_data(json!({ "not_found": true })))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super_tools_core::mocks::{MockIncidentBackend, MockObservabilityBackend};

    fn offline_broker() -> Arc<ToolBroker> {
        Arc::new(ToolBroker::new(
            Arc::new(MockObservabilityBackend::unreachable()),
            Arc::new(MockIncidentBackend::unreachable()),
        ))
    }

    #[test]
    fn test_every_operation_has_object_schema() {
        let tools = broker_tools(offline_broker());
        assert_eq!(tools.len(), 6);
        for tool in &tools {
            assert_eq!(tool.parameters()["type"], "object", "{}", tool.name());
        }
    }

    #[tokio::test]
    async fn test_create_tool_reports_fallback_provenance() {
        let tool = BrokerTool::new(offline_broker(), BrokerOperation::CreateIncident);
        let output = tool
            .execute(
                json!({
                    "title": "VPN down",
                    "description": "No tunnel",
                    "priority": "High",
                    "category": "Network",
                    "requester": "ops"
                }),
                &CorrelationId::new(),
            )
            .await
            .unwrap();

        assert!(output.success);
        let data = output.data.unwrap();
        assert_eq!(data["provenance"], "fallback");
        assert_eq!(data["result"]["status"], "New");
    }

    #[tokio::test]
    async fn test_missing_field_is_invalid_request() {
        let tool = BrokerTool::new(offline_broker(), BrokerOperation::CreateIncident);
        let err = tool
            .execute(json!({"title": "only a title"}), &CorrelationId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_not_found_is_failed_output() {
        let tool = BrokerTool::new(offline_broker(), BrokerOperation::GetMetrics);
        let output = tool
            .execute(json!({"asset_id": "server-01", "metric_type": "gpu"}), &CorrelationId::new())
            .await
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.data.unwrap()["not_found"], true);
    }

    #[tokio::test]
    async fn test_health_check_accepts_null_args() {
        let tool = BrokerTool::new(offline_broker(), BrokerOperation::HealthCheck);
        let output = tool.execute(Value::Null, &CorrelationId::new()).await.unwrap();
        assert_eq!(output.data.unwrap()["result"]["status"], "degraded");
    }
}
