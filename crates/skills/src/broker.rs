//! Tool broker: remote-backed tools with a single-attempt local fallback.
//!
//! Every tool validates its request, calls the remote adapter once under a
//! fixed timeout, and answers from the embedded dataset when that call fails.
//! There is no retry, backoff or circuit breaking.

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super_tools_core::{
    traits::{IncidentBackend, ObservabilityBackend},
    types::{
        AssetSearchResult, ComponentHealth, CorrelationId, CreateIncidentRequest,
        GetMetricsRequest, HealthReport, Incident, IncidentSearchResult, MetricsResult,
        Provenance, SearchAssetsRequest, SearchIncidentsRequest, Sourced, UpdateIncidentRequest,
    },
    Error, Result,
};

use super_tools_governance::{track_fallback, track_tool_call};

use crate::fallback;

/// Reference per-call budget for the remote tier.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub const SEARCH_ASSETS: &str = "observ_search_assets";
pub const GET_METRICS: &str = "observ_get_metrics";
pub const SEARCH_INCIDENTS: &str = "itsm_search_incidents";
pub const CREATE_INCIDENT: &str = "itsm_create_incident";
pub const UPDATE_INCIDENT: &str = "itsm_update_incident";
pub const HEALTH_CHECK: &str = "health_check";

const SERVICE_NAME: &str = "tool-broker";

/// Broker over the observability and incident adapters.
pub struct ToolBroker {
    observability: Arc<dyn ObservabilityBackend>,
    incidents: Arc<dyn IncidentBackend>,
    timeout: Duration,
}

impl ToolBroker {
    /// Create a broker with the reference timeout.
    pub fn new(
        observability: Arc<dyn ObservabilityBackend>,
        incidents: Arc<dyn IncidentBackend>,
    ) -> Self {
        Self {
            observability,
            incidents,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the remote tier under the timeout; answer from `fallback` on a
    /// recoverable failure. Not-found and other errors pass through.
    async fn two_tier<T, Fut, F>(
        &self,
        tool: &'static str,
        correlation_id: &CorrelationId,
        primary: Fut,
        fallback: F,
    ) -> Result<Sourced<T>>
    where
        Fut: Future<Output = Result<T>>,
        F: FnOnce() -> Result<T>,
    {
        let start = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, primary).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(format!(
                "{} exceeded {}ms",
                tool,
                self.timeout.as_millis()
            ))),
        };

        match outcome {
            Ok(payload) => {
                track_tool_call(tool, Provenance::Remote, start.elapsed().as_secs_f64());
                Ok(Sourced::remote(payload))
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(
                    tool,
                    correlation_id = %correlation_id,
                    error = %e,
                    "Remote adapter failed, answering from fallback dataset"
                );
                track_fallback(tool, &e);
                let payload = fallback()?;
                track_tool_call(tool, Provenance::Fallback, start.elapsed().as_secs_f64());
                Ok(Sourced::fallback(payload))
            }
            Err(e) => {
                tracing::info!(
                    tool,
                    correlation_id = %correlation_id,
                    error = %e,
                    "Remote adapter rejected the request"
                );
                Err(e)
            }
        }
    }

    /// Search monitored assets.
    pub async fn search_assets(
        &self,
        request: &SearchAssetsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Sourced<AssetSearchResult>> {
        request.validate()?;
        tracing::info!(
            tool = SEARCH_ASSETS,
            correlation_id = %correlation_id,
            query = %request.query,
            limit = request.limit,
            "Tool called"
        );

        self.two_tier(
            SEARCH_ASSETS,
            correlation_id,
            self.observability.search_assets(request, correlation_id),
            || Ok(fallback::search_assets(request)),
        )
        .await
    }

    /// Read one metric for one asset.
    pub async fn get_metrics(
        &self,
        request: &GetMetricsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Sourced<MetricsResult>> {
        request.validate()?;
        tracing::info!(
            tool = GET_METRICS,
            correlation_id = %correlation_id,
            asset_id = %request.asset_id,
            metric_type = %request.metric_type,
            "Tool called"
        );

        self.two_tier(
            GET_METRICS,
            correlation_id,
            self.observability.get_metrics(request, correlation_id),
            || fallback::get_metrics(request),
        )
        .await
    }

    /// Search incidents.
    pub async fn search_incidents(
        &self,
        request: &SearchIncidentsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Sourced<IncidentSearchResult>> {
        request.validate()?;
        tracing::info!(
            tool = SEARCH_INCIDENTS,
            correlation_id = %correlation_id,
            query = %request.query,
            status = ?request.status,
            priority = ?request.priority,
            limit = request.limit,
            "Tool called"
        );

        self.two_tier(
            SEARCH_INCIDENTS,
            correlation_id,
            self.incidents.search_incidents(request, correlation_id),
            || Ok(fallback::search_incidents(request)),
        )
        .await
    }

    /// Open a new incident.
    pub async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Sourced<Incident>> {
        request.validate()?;
        tracing::info!(
            tool = CREATE_INCIDENT,
            correlation_id = %correlation_id,
            title = %request.title,
            priority = %request.priority,
            category = %request.category,
            "Tool called"
        );

        self.two_tier(
            CREATE_INCIDENT,
            correlation_id,
            self.incidents.create_incident(request, correlation_id),
            || Ok(fallback::create_incident(request)),
        )
        .await
    }

    /// Change status, priority or resolution of an incident.
    pub async fn update_incident(
        &self,
        request: &UpdateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Sourced<Incident>> {
        request.validate()?;
        tracing::info!(
            tool = UPDATE_INCIDENT,
            correlation_id = %correlation_id,
            incident_id = %request.incident_id,
            status = ?request.status,
            priority = ?request.priority,
            "Tool called"
        );

        self.two_tier(
            UPDATE_INCIDENT,
            correlation_id,
            self.incidents.update_incident(request, correlation_id),
            || fallback::update_incident(request),
        )
        .await
    }

    /// Probe both adapters concurrently. Never fails: an unreachable adapter
    /// degrades the report and marks it as fallback-sourced.
    pub async fn health_check(&self, correlation_id: &CorrelationId) -> Sourced<HealthReport> {
        tracing::info!(tool = HEALTH_CHECK, correlation_id = %correlation_id, "Tool called");

        let (observability, incidents) = futures::join!(
            tokio::time::timeout(self.timeout, self.observability.health(correlation_id)),
            tokio::time::timeout(self.timeout, self.incidents.health(correlation_id)),
        );

        let components = vec![
            component("observability-adapter", observability.is_ok_and(|r| r.is_ok())),
            component("itsm-adapter", incidents.is_ok_and(|r| r.is_ok())),
        ];
        let degraded = components.iter().any(|c| c.status != "healthy");
        if degraded {
            tracing::warn!(
                correlation_id = %correlation_id,
                components = ?components,
                "Adapter health degraded"
            );
        }

        let report = HealthReport {
            status: if degraded { "degraded" } else { "healthy" }.to_string(),
            service: SERVICE_NAME.to_string(),
            timestamp: Utc::now(),
            components,
        };

        let provenance = if degraded {
            Provenance::Fallback
        } else {
            Provenance::Remote
        };
        record(HEALTH_CHECK, provenance);
        Sourced {
            payload: report,
            provenance,
        }
    }
}

fn component(name: &str, reachable: bool) -> ComponentHealth {
    ComponentHealth {
        name: name.to_string(),
        status: if reachable { "healthy" } else { "unreachable" }.to_string(),
    }
}
