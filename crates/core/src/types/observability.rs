use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::tool::{check_limit, default_limit, require_non_blank};
use crate::Result;

// =============================================================================
// Observability Tool Types
// =============================================================================

/// `observ_search_assets` input.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchAssetsRequest {
    /// Substring matched against asset name, type, location and tags.
    pub query: String,
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SearchAssetsRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: default_limit(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_limit(self.limit)
    }
}

/// A monitored asset as the observability adapter reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub location: String,
    pub environment: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `observ_search_assets` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSearchResult {
    pub assets: Vec<Asset>,
    pub total: usize,
    pub query: String,
}

fn default_metric_type() -> String {
    "cpu".to_string()
}

/// `observ_get_metrics` input.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetMetricsRequest {
    /// Asset to read metrics for.
    pub asset_id: String,
    /// Metric type (cpu, memory, disk, ...).
    #[serde(default = "default_metric_type")]
    pub metric_type: String,
}

impl GetMetricsRequest {
    pub fn new(asset_id: impl Into<String>, metric_type: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            metric_type: metric_type.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank("asset_id", &self.asset_id)?;
        require_non_blank("metric_type", &self.metric_type)
    }
}

/// One metric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricData {
    pub usage: f64,
    pub unit: String,
    pub timestamp: String,
    pub status: String,
}

/// `observ_get_metrics` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub asset_id: String,
    pub metric_type: String,
    pub data: MetricData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_on_deserialize() {
        let req: SearchAssetsRequest = serde_json::from_value(serde_json::json!({"query": "web"})).unwrap();
        assert_eq!(req.limit, 10);

        let req: GetMetricsRequest =
            serde_json::from_value(serde_json::json!({"asset_id": "server-01"})).unwrap();
        assert_eq!(req.metric_type, "cpu");
    }

    #[test]
    fn test_asset_type_field_name() {
        let json = serde_json::json!({
            "id": "app-01",
            "name": "Main Application",
            "type": "application",
            "location": "cloud",
            "environment": "production",
            "tags": ["aws"]
        });
        let asset: Asset = serde_json::from_value(json).unwrap();
        assert_eq!(asset.asset_type, "application");
    }

    #[test]
    fn test_blank_asset_id_rejected() {
        assert!(GetMetricsRequest::new(" ", "cpu").validate().is_err());
        assert!(GetMetricsRequest::new("server-01", "").validate().is_err());
    }
}
