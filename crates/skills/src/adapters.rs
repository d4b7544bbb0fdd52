//! HTTP clients for the remote incident and observability adapters.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

use super_tools_core::{
    traits::{IncidentBackend, ObservabilityBackend},
    types::{
        AssetSearchResult, CorrelationId, CreateIncidentRequest, GetMetricsRequest, Incident,
        IncidentPatch, IncidentSearchResult, MetricsResult, SearchAssetsRequest,
        SearchIncidentsRequest, UpdateIncidentRequest, CORRELATION_HEADER,
    },
    Error, Result,
};

/// Versioned API prefix both adapters serve their resources under.
const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Shared plumbing: base URL handling, correlation header, status mapping.
#[derive(Clone)]
struct AdapterClient {
    name: &'static str,
    client: reqwest::Client,
    base_url: Url,
}

impl AdapterClient {
    fn new(name: &'static str, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::adapter(format!("Invalid {} adapter URL {}: {}", name, base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::adapter(format!(
                "{} adapter URL cannot be a base: {}",
                name, base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::adapter(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            name,
            client,
            base_url,
        })
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::adapter(format!("{} adapter URL cannot be a base", self.name)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Join segments under the versioned API prefix.
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut all: Vec<&str> = API_PREFIX.to_vec();
        all.extend_from_slice(segments);
        self.url(&all)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::timeout(format!("{} adapter did not answer in time", self.name))
        } else {
            Error::adapter(format!("{} adapter request failed: {}", self.name, err))
        }
    }

    /// Send a request and decode the JSON body.
    ///
    /// `not_found` names the addressed resource; when set, a 404 becomes
    /// `Error::NotFound` instead of a remote failure.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        correlation_id: &CorrelationId,
        not_found: Option<(&str, String)>,
    ) -> Result<T> {
        let response = self.execute(builder, correlation_id).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            if let Some((kind, id)) = not_found {
                return Err(Error::not_found(kind, id));
            }
        }
        if !status.is_success() {
            return Err(Error::adapter(format!(
                "{} adapter returned {}",
                self.name, status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            Error::adapter(format!("{} adapter sent an unreadable body: {}", self.name, e))
        })
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        correlation_id: &CorrelationId,
    ) -> Result<reqwest::Response> {
        builder
            .header(CORRELATION_HEADER, correlation_id.as_str())
            .send()
            .await
            .map_err(|e| self.transport_error(e))
    }

    async fn health(&self, correlation_id: &CorrelationId) -> Result<()> {
        let url = self.url(&["health"])?;
        let response = self.execute(self.client.get(url), correlation_id).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::adapter(format!(
                "{} adapter health returned {}",
                self.name,
                response.status()
            )))
        }
    }
}

// =============================================================================
// Observability Adapter
// =============================================================================

/// Client for the observability adapter.
#[derive(Clone)]
pub struct HttpObservabilityAdapter {
    inner: AdapterClient,
}

impl HttpObservabilityAdapter {
    /// Create a client for the adapter at `base_url` (scheme, host and port).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: AdapterClient::new("observability", base_url, timeout)?,
        })
    }
}

#[async_trait]
impl ObservabilityBackend for HttpObservabilityAdapter {
    async fn search_assets(
        &self,
        request: &SearchAssetsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<AssetSearchResult> {
        let url = self.inner.api_url(&["nodes", "query"])?;
        let builder = self
            .inner
            .client
            .post(url)
            .json(&json!({ "query": request.query, "limit": request.limit }));
        self.inner.send(builder, correlation_id, None).await
    }

    async fn get_metrics(
        &self,
        request: &GetMetricsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<MetricsResult> {
        let url = self
            .inner
            .api_url(&["nodes", &request.asset_id, "metrics"])?;
        let builder = self
            .inner
            .client
            .get(url)
            .query(&[("metric_type", request.metric_type.as_str())]);
        let resource = format!("{}/{}", request.asset_id, request.metric_type);
        self.inner
            .send(builder, correlation_id, Some(("Metrics", resource)))
            .await
    }

    async fn health(&self, correlation_id: &CorrelationId) -> Result<()> {
        self.inner.health(correlation_id).await
    }
}

// =============================================================================
// Incident Adapter
// =============================================================================

/// Client for the incident-management adapter.
#[derive(Clone)]
pub struct HttpIncidentAdapter {
    inner: AdapterClient,
}

impl HttpIncidentAdapter {
    /// Create a client for the adapter at `base_url` (scheme, host and port).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: AdapterClient::new("incident", base_url, timeout)?,
        })
    }
}

#[async_trait]
impl IncidentBackend for HttpIncidentAdapter {
    async fn search_incidents(
        &self,
        request: &SearchIncidentsRequest,
        correlation_id: &CorrelationId,
    ) -> Result<IncidentSearchResult> {
        let url = self.inner.api_url(&["incidents"])?;
        let limit = request.limit.to_string();
        let mut params = vec![("query", request.query.as_str()), ("limit", limit.as_str())];
        if let Some(status) = &request.status {
            params.push(("status", status.as_str()));
        }
        if let Some(priority) = &request.priority {
            params.push(("priority", priority.as_str()));
        }

        let builder = self.inner.client.get(url).query(&params);
        let mut result: IncidentSearchResult =
            self.inner.send(builder, correlation_id, None).await?;
        if result.query.is_empty() {
            result.query = request.query.clone();
        }
        Ok(result)
    }

    async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Incident> {
        let url = self.inner.api_url(&["incidents"])?;
        let builder = self.inner.client.post(url).json(request);
        self.inner.send(builder, correlation_id, None).await
    }

    async fn update_incident(
        &self,
        request: &UpdateIncidentRequest,
        correlation_id: &CorrelationId,
    ) -> Result<Incident> {
        let url = self.inner.api_url(&["incidents", &request.incident_id])?;
        let builder = self
            .inner
            .client
            .put(url)
            .json(&IncidentPatch::from(request));
        self.inner
            .send(
                builder,
                correlation_id,
                Some(("Incident", request.incident_id.clone())),
            )
            .await
    }

    async fn health(&self, correlation_id: &CorrelationId) -> Result<()> {
        self.inner.health(correlation_id).await
    }
}
