//! Mock implementations of core traits for testing.
//!
//! Shared by the unit and integration tests of every layer so that broker,
//! agent and gateway tests script the same remote behaviour.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::{
    traits::{Agent, IncidentBackend, IntentClassifier, ObservabilityBackend},
    types::{
        AgentResponse, Asset, AssetSearchResult, CorrelationId, CreateIncidentRequest,
        GetMetricsRequest, Incident, IncidentSearchResult, Intent, Message, MetricData,
        MetricsResult, RoutingContext, SearchAssetsRequest, SearchIncidentsRequest,
        UpdateIncidentRequest, STATUS_NEW,
    },
    Error, Result,
};

/// How a mock backend answers every call.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Answer with the mock's remote data.
    Succeed,
    /// Fail like an unreachable adapter.
    Fail,
    /// Sleep for the given duration, then answer like `Succeed`.
    Hang(Duration),
    /// Report every addressed resource as missing.
    NotFound,
}

/// Records calls and the correlation ids they carried.
#[derive(Default)]
struct CallLog {
    count: AtomicUsize,
    correlation_ids: Mutex<Vec<String>>,
}

impl CallLog {
    fn record(&self, correlation_id: &CorrelationId) {
        self.count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut ids) = self.correlation_ids.lock() {
            ids.push(correlation_id.to_string());
        }
    }

    fn ids(&self) -> Vec<String> {
        self.correlation_ids
            .lock()
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }
}

async fn behave(behavior: MockBehavior) -> Result<()> {
    match behavior {
        MockBehavior::Succeed => Ok(()),
        MockBehavior::Fail => Err(Error::adapter("connection refused")),
        MockBehavior::Hang(duration) => {
            tokio::time::sleep(duration).await;
            Ok(())
        }
        MockBehavior::NotFound => Ok(()),
    }
}

// =============================================================================
// Mock Observability Backend
// =============================================================================

/// Scripted observability adapter.
pub struct MockObservabilityBackend {
    behavior: MockBehavior,
    calls: CallLog,
}

impl MockObservabilityBackend {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: CallLog::default(),
        }
    }

    /// An adapter that always answers.
    pub fn healthy() -> Self {
        Self::new(MockBehavior::Succeed)
    }

    /// An adapter that is never reachable.
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Fail)
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.count.load(Ordering::SeqCst)
    }

    /// Correlation ids carried by the received calls.
    pub fn correlation_ids(&self) -> Vec<String> {
        self.calls.ids()
    }

    /// The single asset this mock reports.
    pub fn remote_asset() -> Asset {
        Asset {
            id: "remote-01".into(),
            name: "Remote Server 01".into(),
            asset_type: "server".into(),
            location: "DC-R".into(),
            environment: "production".into(),
            tags: vec!["remote".into()],
        }
    }
}

#[async_trait]
impl ObservabilityBackend for MockObservabilityBackend {
    async fn search_assets(
        &self,
        request: &SearchAssetsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<AssetSearchResult> {
        self.calls.record(correlation_id);
        behave(self.behavior).await?;
        let assets = vec![Self::remote_asset()];
        Ok(AssetSearchResult {
            total: assets.len(),
            assets,
            query: request.query.clone(),
        })
    }

    async fn get_metrics(
        &self,
        request: &GetMetricsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<MetricsResult> {
        self.calls.record(correlation_id);
        behave(self.behavior).await?;
        if matches!(self.behavior, MockBehavior::NotFound) {
            return Err(Error::not_found("Asset", &request.asset_id));
        }
        Ok(MetricsResult {
            asset_id: request.asset_id.clone(),
            metric_type: request.metric_type.clone(),
            data: MetricData {
                usage: 12.5,
                unit: "%".into(),
                timestamp: "2025-09-29T12:00:00Z".into(),
                status: "normal".into(),
            },
        })
    }

    async fn health(&self, correlation_id: &CorrelationId) -> Result<()> {
        self.calls.record(correlation_id);
        behave(self.behavior).await
    }
}

// =============================================================================
// Mock Incident Backend
// =============================================================================

/// Scripted incident adapter.
pub struct MockIncidentBackend {
    behavior: MockBehavior,
    calls: CallLog,
}

impl MockIncidentBackend {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: CallLog::default(),
        }
    }

    /// An adapter that always answers.
    pub fn healthy() -> Self {
        Self::new(MockBehavior::Succeed)
    }

    /// An adapter that is never reachable.
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Fail)
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.count.load(Ordering::SeqCst)
    }

    /// Correlation ids carried by the received calls.
    pub fn correlation_ids(&self) -> Vec<String> {
        self.calls.ids()
    }

    /// The incident this mock reports for searches and updates.
    pub fn remote_incident(id: &str) -> Incident {
        Incident {
            incident_id: id.to_string(),
            title: "Remote VPN outage".into(),
            description: "Reported by the remote adapter".into(),
            status: "Assigned".into(),
            priority: "High".into(),
            category: "Network".into(),
            requester: "remote@company.com".into(),
            assigned_group: Some("Network Team".into()),
            created_date: Some("2025-09-29T10:00:00Z".into()),
            updated_date: Some("2025-09-29T10:00:00Z".into()),
            resolution: None,
        }
    }
}

#[async_trait]
impl IncidentBackend for MockIncidentBackend {
    async fn search_incidents(
        &self,
        request: &SearchIncidentsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<IncidentSearchResult> {
        self.calls.record(correlation_id);
        behave(self.behavior).await?;
        Ok(IncidentSearchResult {
            incidents: vec![Self::remote_incident("INC7000")],
            total_count: 1,
            query: request.query.clone(),
        })
    }

    async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Incident> {
        self.calls.record(correlation_id);
        behave(self.behavior).await?;
        Ok(Incident {
            incident_id: "INC7001".into(),
            title: request.title.clone(),
            description: request.description.clone(),
            status: STATUS_NEW.into(),
            priority: request.priority.clone(),
            category: request.category.clone(),
            requester: request.requester.clone(),
            assigned_group: None,
            created_date: Some("2025-09-29T12:00:00Z".into()),
            updated_date: Some("2025-09-29T12:00:00Z".into()),
            resolution: None,
        })
    }

    async fn update_incident(
        &self,
        request: &UpdateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Incident> {
        self.calls.record(correlation_id);
        behave(self.behavior).await?;
        if matches!(self.behavior, MockBehavior::NotFound) {
            return Err(Error::not_found("Incident", &request.incident_id));
        }
        let mut incident = Self::remote_incident(&request.incident_id);
        request.apply_to(&mut incident, "2025-09-29T12:30:00Z");
        Ok(incident)
    }

    async fn health(&self, correlation_id: &CorrelationId) -> Result<()> {
        self.calls.record(correlation_id);
        behave(self.behavior).await
    }
}

// =============================================================================
// Mock Classifier & Agents
// =============================================================================

/// Classifier that returns one fixed intent.
pub struct FixedClassifier(pub Intent);

impl IntentClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> Intent {
        self.0
    }
}

/// Agent that answers with a fixed text and records how often it ran.
pub struct EchoAgent {
    name: String,
    calls: AtomicUsize,
}

impl EchoAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for EchoAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&self, message: &Message, _context: &RoutingContext) -> AgentResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        AgentResponse::ok(format!("{}: {}", self.name, message.text)).with("agent", self.name.clone())
    }
}

/// Agent that panics on every message.
pub struct PanickingAgent;

#[async_trait]
impl Agent for PanickingAgent {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn process(&self, _message: &Message, _context: &RoutingContext) -> AgentResponse {
        panic!("agent blew up")
    }
}
