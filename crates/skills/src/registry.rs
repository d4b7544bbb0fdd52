//! Tool registry implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super_tools_core::{
    traits::{Tool, ToolRegistry},
    types::{CorrelationId, ToolDefinition, ToolOutput},
    Error, Result,
};

use crate::broker::ToolBroker;
use crate::tools::broker_tools;

/// Default tool registry using DashMap.
pub struct DefaultToolRegistry {
    /// Registered tools.
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl DefaultToolRegistry {
    /// Create a new tool registry.
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for DefaultToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolRegistry for DefaultToolRegistry {
    async fn register(&self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        tracing::info!(tool = %name, "Registering tool");

        if self.tools.contains_key(&name) {
            return Err(Error::Internal(format!(
                "Tool '{}' is already registered",
                name
            )));
        }

        self.tools.insert(name, Arc::from(tool));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ToolDefinition>> {
        let mut definitions: Vec<_> = self
            .tools
            .iter()
            .map(|entry| ToolDefinition {
                name: entry.name().to_string(),
                description: entry.description().to_string(),
                parameters: entry.parameters(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(definitions)
    }

    async fn execute(
        &self,
        name: &str,
        args: serde_json::Value,
        correlation_id: &CorrelationId,
    ) -> Result<ToolOutput> {
        // Clone the Arc so no map guard is held across the await.
        let tool = self
            .tools
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::tool_not_found(name))?;

        tracing::debug!(tool = %name, correlation_id = %correlation_id, "Executing tool");

        tool.execute(args, correlation_id).await
    }
}

/// Create a registry holding every broker tool.
pub async fn create_broker_registry(broker: Arc<ToolBroker>) -> Result<DefaultToolRegistry> {
    let registry = DefaultToolRegistry::new();
    for tool in broker_tools(broker) {
        registry.register(tool).await?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{BrokerOperation, BrokerTool};
    use super_tools_core::mocks::{MockIncidentBackend, MockObservabilityBackend};

    fn broker() -> Arc<ToolBroker> {
        Arc::new(ToolBroker::new(
            Arc::new(MockObservabilityBackend::healthy()),
            Arc::new(MockIncidentBackend::healthy()),
        ))
    }

    #[tokio::test]
    async fn test_register_and_list() {
        let registry = create_broker_registry(broker()).await.unwrap();

        let tools = registry.list().await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "health_check",
                "itsm_create_incident",
                "itsm_search_incidents",
                "itsm_update_incident",
                "observ_get_metrics",
                "observ_search_assets",
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let registry = DefaultToolRegistry::new();
        registry
            .register(Box::new(BrokerTool::new(broker(), BrokerOperation::HealthCheck)))
            .await
            .unwrap();

        let result = registry
            .register(Box::new(BrokerTool::new(broker(), BrokerOperation::HealthCheck)))
            .await;
        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_execute() {
        let registry = create_broker_registry(broker()).await.unwrap();

        let result = registry
            .execute(
                "observ_search_assets",
                serde_json::json!({"query": "server"}),
                &CorrelationId::new(),
            )
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["provenance"], "remote");
    }

    #[tokio::test]
    async fn test_execute_not_found() {
        let registry = DefaultToolRegistry::new();

        let result = registry
            .execute("nonexistent", serde_json::json!({}), &CorrelationId::new())
            .await;

        assert!(matches!(result, Err(Error::ToolNotFound(_))));
    }
}
