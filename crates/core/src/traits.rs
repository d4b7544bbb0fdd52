//! Core traits for Super Tools.
//!
//! These traits define the contracts between the layers of one routing
//! cycle: classifier, agents, remote adapters, and named tools.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{
    AgentResponse, AssetSearchResult, CorrelationId, CreateIncidentRequest, GetMetricsRequest,
    Incident, IncidentSearchResult, Intent, Message, MetricsResult, RoutingContext,
    SearchAssetsRequest, SearchIncidentsRequest, ToolDefinition, ToolOutput,
    UpdateIncidentRequest,
};

// =============================================================================
// Routing Traits
// =============================================================================

/// Maps free text to an intent. Never fails and never blocks.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}

/// A domain handler that owns one intent.
///
/// `process` always yields a response; failures are reported through
/// `AgentResponse::success`.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Short agent name used in logs.
    fn name(&self) -> &str;

    /// Handle one message.
    async fn process(&self, message: &Message, context: &RoutingContext) -> AgentResponse;
}

// =============================================================================
// Remote Adapter Traits
// =============================================================================

/// Client side of the observability adapter contract.
#[async_trait]
pub trait ObservabilityBackend: Send + Sync {
    /// `POST /nodes/query`
    async fn search_assets(
        &self,
        request: &SearchAssetsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<AssetSearchResult>;

    /// `GET /nodes/{id}/metrics`. Unknown asset or metric type is `Error::NotFound`.
    async fn get_metrics(
        &self,
        request: &GetMetricsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<MetricsResult>;

    /// `GET /health`
    async fn health(&self, correlation_id: &CorrelationId) -> Result<()>;
}

/// Client side of the incident adapter contract.
#[async_trait]
pub trait IncidentBackend: Send + Sync {
    /// `GET /incidents`
    async fn search_incidents(
        &self,
        request: &SearchIncidentsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<IncidentSearchResult>;

    /// `POST /incidents`
    async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Incident>;

    /// `PUT /incidents/{id}`. Unknown id is `Error::NotFound`.
    async fn update_incident(
        &self,
        request: &UpdateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Incident>;

    /// `GET /health`
    async fn health(&self, correlation_id: &CorrelationId) -> Result<()>;
}

// =============================================================================
// Tool Traits
// =============================================================================

/// A named tool invoked with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the unique name of the tool.
    fn name(&self) -> &str;

    /// Get the human-readable description.
    fn description(&self) -> &str;

    /// Get the JSON Schema for parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value, correlation_id: &CorrelationId) -> Result<ToolOutput>;
}

/// Tool registry for managing available tools.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Register a new tool.
    async fn register(&self, tool: Box<dyn Tool>) -> Result<()>;

    /// List all available tools.
    async fn list(&self) -> Result<Vec<ToolDefinition>>;

    /// Execute a tool by name with arguments.
    async fn execute(
        &self,
        name: &str,
        args: Value,
        correlation_id: &CorrelationId,
    ) -> Result<ToolOutput>;
}
