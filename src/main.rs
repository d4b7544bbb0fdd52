#![deny(unused)]
//! Super Tools - intent-routed tool broker behind a channel gateway.
//!
//! Classifies inbound messages, dispatches them to a domain agent and
//! answers through remote incident and observability adapters, falling back
//! to embedded data when an adapter is down.

use std::sync::Arc;

use super_tools_controller::AgentRouter;
use super_tools_core::{config::AppConfig, types::CorrelationId};
use super_tools_gateway::{GatewayConfig, GatewayServer};
use super_tools_governance::BearerValidator;
use super_tools_skills::{
    create_broker_registry, HttpIncidentAdapter, HttpObservabilityAdapter, ToolBroker,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize tracing
    super_tools_governance::configure_tracing(&config.telemetry)?;

    tracing::info!("Starting Super Tools v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Failed to load configuration, using defaults");
    }

    let metrics_handle = match super_tools_governance::setup_metrics_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Metrics disabled");
            None
        }
    };

    // =========================================================================
    // Tool layer: adapters, broker, named tools
    // =========================================================================
    let timeout = config.broker.timeout();
    let observability = Arc::new(HttpObservabilityAdapter::new(
        &config.broker.observability_url,
        timeout,
    )?);
    let incidents = Arc::new(HttpIncidentAdapter::new(&config.broker.itsm_url, timeout)?);
    let broker = Arc::new(ToolBroker::new(observability, incidents).with_timeout(timeout));

    let tools = Arc::new(create_broker_registry(broker.clone()).await?);
    tracing::info!(
        tools_count = tools.len(),
        observability_url = %config.broker.observability_url,
        itsm_url = %config.broker.itsm_url,
        timeout_ms = config.broker.timeout_ms,
        "Tool broker initialized"
    );

    let health = broker.health_check(&CorrelationId::new()).await;
    tracing::info!(
        status = %health.payload.status,
        components = ?health.payload.components,
        "Adapter health at startup"
    );

    // =========================================================================
    // Agent layer
    // =========================================================================
    let router = Arc::new(AgentRouter::with_broker(broker));
    tracing::info!("Agent router initialized");

    // =========================================================================
    // Channel gateway
    // =========================================================================
    let validator = Arc::new(BearerValidator::new(config.gateway.token_prefix.clone()));
    let mut server = GatewayServer::new(GatewayConfig::from(&config), router, tools, validator);
    if let Some(handle) = metrics_handle {
        server = server.with_metrics(handle);
    }

    server.run().await?;
    Ok(())
}
