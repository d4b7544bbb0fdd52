//! Embedded fallback datasets.
//!
//! When a remote adapter cannot answer, the broker shapes its reply from these
//! read-only tables the same way the adapter would. Nothing here is ever
//! mutated, so concurrent callers share the tables freely.

use super_tools_core::{
    types::{
        Asset, AssetSearchResult, CreateIncidentRequest, GetMetricsRequest, Incident,
        IncidentSearchResult, MetricData, MetricsResult, SearchAssetsRequest,
        SearchIncidentsRequest, UpdateIncidentRequest, STATUS_NEW,
    },
    Error, Result,
};

/// Timestamp stamped on every fallback metric sample.
pub const SAMPLE_TIMESTAMP: &str = "2025-09-29T12:00:00Z";

/// Id given to incidents created while the incident adapter is down.
pub const FALLBACK_INCIDENT_ID: &str = "INC9999";

const FALLBACK_CREATED_DATE: &str = "2024-01-15T10:30:00Z";
const FALLBACK_UPDATED_DATE: &str = "2024-01-15T14:45:00Z";

struct AssetRecord {
    id: &'static str,
    name: &'static str,
    asset_type: &'static str,
    location: &'static str,
    environment: &'static str,
    tags: &'static [&'static str],
}

const ASSETS: &[AssetRecord] = &[
    AssetRecord {
        id: "server-01",
        name: "Web Server 01",
        asset_type: "server",
        location: "DC-A",
        environment: "production",
        tags: &["web", "nginx", "linux"],
    },
    AssetRecord {
        id: "server-02",
        name: "Database Server 02",
        asset_type: "server",
        location: "DC-B",
        environment: "production",
        tags: &["database", "postgresql", "linux"],
    },
    AssetRecord {
        id: "server-03",
        name: "Application Server 03",
        asset_type: "server",
        location: "DC-A",
        environment: "staging",
        tags: &["app", "java", "tomcat"],
    },
    AssetRecord {
        id: "app-01",
        name: "Main Application",
        asset_type: "application",
        location: "cloud",
        environment: "production",
        tags: &["microservice", "kubernetes", "aws"],
    },
    AssetRecord {
        id: "db-01",
        name: "Analytics Database",
        asset_type: "database",
        location: "cloud",
        environment: "production",
        tags: &["analytics", "bigquery", "gcp"],
    },
];

struct MetricRecord {
    asset_id: &'static str,
    metric_type: &'static str,
    usage: f64,
    unit: &'static str,
    status: &'static str,
}

const fn metric(
    asset_id: &'static str,
    metric_type: &'static str,
    usage: f64,
    unit: &'static str,
    status: &'static str,
) -> MetricRecord {
    MetricRecord {
        asset_id,
        metric_type,
        usage,
        unit,
        status,
    }
}

const METRICS: &[MetricRecord] = &[
    metric("server-01", "cpu", 45.2, "%", "normal"),
    metric("server-01", "memory", 67.8, "%", "warning"),
    metric("server-01", "disk", 23.1, "%", "normal"),
    metric("server-01", "network", 12.5, "Mbps", "normal"),
    metric("server-02", "cpu", 78.9, "%", "critical"),
    metric("server-02", "memory", 89.3, "%", "critical"),
    metric("server-02", "disk", 45.6, "%", "warning"),
    metric("server-02", "network", 25.8, "Mbps", "normal"),
    metric("server-03", "cpu", 23.4, "%", "normal"),
    metric("server-03", "memory", 34.7, "%", "normal"),
    metric("server-03", "disk", 67.2, "%", "warning"),
    metric("server-03", "network", 8.9, "Mbps", "normal"),
    metric("app-01", "cpu", 56.7, "%", "normal"),
    metric("app-01", "memory", 72.1, "%", "warning"),
    metric("app-01", "response_time", 245.0, "ms", "normal"),
    metric("app-01", "error_rate", 0.02, "%", "normal"),
    metric("db-01", "cpu", 34.5, "%", "normal"),
    metric("db-01", "memory", 45.8, "%", "normal"),
    metric("db-01", "connections", 127.0, "count", "normal"),
    metric("db-01", "query_time", 15.2, "ms", "normal"),
];

struct IncidentRecord {
    incident_id: &'static str,
    title: &'static str,
    description: &'static str,
    status: &'static str,
    priority: &'static str,
    category: &'static str,
    requester: &'static str,
    assigned_group: &'static str,
    created_date: &'static str,
    updated_date: &'static str,
    resolution: Option<&'static str>,
}

const INCIDENTS: &[IncidentRecord] = &[
    IncidentRecord {
        incident_id: "INC0001",
        title: "Database Connection Timeout",
        description: "Users reporting slow response times from database queries",
        status: "Assigned",
        priority: "High",
        category: "Database",
        requester: "john.doe@company.com",
        assigned_group: "Database Team",
        created_date: "2024-01-15T10:30:00Z",
        updated_date: "2024-01-15T14:45:00Z",
        resolution: None,
    },
    IncidentRecord {
        incident_id: "INC0002",
        title: "Email Server Down",
        description: "Email service is not responding",
        status: "Resolved",
        priority: "Critical",
        category: "Email",
        requester: "jane.smith@company.com",
        assigned_group: "Infrastructure Team",
        created_date: "2024-01-14T08:15:00Z",
        updated_date: "2024-01-14T12:30:00Z",
        resolution: Some("Restarted email service and cleared queue"),
    },
];

impl AssetRecord {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.asset_type.to_lowercase().contains(needle)
            || self.location.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    fn to_asset(&self) -> Asset {
        Asset {
            id: self.id.to_string(),
            name: self.name.to_string(),
            asset_type: self.asset_type.to_string(),
            location: self.location.to_string(),
            environment: self.environment.to_string(),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl IncidentRecord {
    fn matches(&self, request: &SearchIncidentsRequest, needle: &str) -> bool {
        let text = self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle);
        let status = request
            .status
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case(self.status));
        let priority = request
            .priority
            .as_deref()
            .map_or(true, |p| p.eq_ignore_ascii_case(self.priority));
        text && status && priority
    }

    fn to_incident(&self) -> Incident {
        Incident {
            incident_id: self.incident_id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            status: self.status.to_string(),
            priority: self.priority.to_string(),
            category: self.category.to_string(),
            requester: self.requester.to_string(),
            assigned_group: Some(self.assigned_group.to_string()),
            created_date: Some(self.created_date.to_string()),
            updated_date: Some(self.updated_date.to_string()),
            resolution: self.resolution.map(str::to_string),
        }
    }
}

/// Substring search over name, type, location and tags. `total` counts the
/// returned page, as the observability adapter does.
pub fn search_assets(request: &SearchAssetsRequest) -> AssetSearchResult {
    let needle = request.query.to_lowercase();
    let assets: Vec<Asset> = ASSETS
        .iter()
        .filter(|a| a.matches(&needle))
        .take(request.limit)
        .map(AssetRecord::to_asset)
        .collect();

    AssetSearchResult {
        total: assets.len(),
        assets,
        query: request.query.clone(),
    }
}

/// Whether the fallback inventory knows this asset id.
pub fn is_known_asset(asset_id: &str) -> bool {
    ASSETS.iter().any(|a| a.id == asset_id)
}

/// Metric lookup. Unknown asset or unsupported metric type is `NotFound`.
pub fn get_metrics(request: &GetMetricsRequest) -> Result<MetricsResult> {
    if !is_known_asset(&request.asset_id) {
        return Err(Error::not_found("Asset", &request.asset_id));
    }

    let record = METRICS
        .iter()
        .find(|m| m.asset_id == request.asset_id && m.metric_type == request.metric_type)
        .ok_or_else(|| {
            Error::not_found(
                "Metrics",
                format!("{}/{}", request.asset_id, request.metric_type),
            )
        })?;

    Ok(MetricsResult {
        asset_id: request.asset_id.clone(),
        metric_type: request.metric_type.clone(),
        data: MetricData {
            usage: record.usage,
            unit: record.unit.to_string(),
            timestamp: SAMPLE_TIMESTAMP.to_string(),
            status: record.status.to_string(),
        },
    })
}

/// Substring search over title and description with optional exact filters.
/// `total_count` counts every match before `limit`.
pub fn search_incidents(request: &SearchIncidentsRequest) -> IncidentSearchResult {
    let needle = request.query.to_lowercase();
    let matches: Vec<&IncidentRecord> = INCIDENTS
        .iter()
        .filter(|i| i.matches(request, &needle))
        .collect();

    IncidentSearchResult {
        total_count: matches.len(),
        incidents: matches
            .into_iter()
            .take(request.limit)
            .map(IncidentRecord::to_incident)
            .collect(),
        query: request.query.clone(),
    }
}

/// A synthetic `New` incident. Nothing is stored.
pub fn create_incident(request: &CreateIncidentRequest) -> Incident {
    Incident {
        incident_id: FALLBACK_INCIDENT_ID.to_string(),
        title: request.title.clone(),
        description: request.description.clone(),
        status: STATUS_NEW.to_string(),
        priority: request.priority.clone(),
        category: request.category.clone(),
        requester: request.requester.clone(),
        assigned_group: None,
        created_date: Some(FALLBACK_CREATED_DATE.to_string()),
        updated_date: Some(FALLBACK_CREATED_DATE.to_string()),
        resolution: None,
    }
}

/// Apply an update to a copy of the dataset record.
pub fn update_incident(request: &UpdateIncidentRequest) -> Result<Incident> {
    let mut incident = INCIDENTS
        .iter()
        .find(|i| i.incident_id.eq_ignore_ascii_case(request.incident_id.trim()))
        .map(IncidentRecord::to_incident)
        .ok_or_else(|| Error::not_found("Incident", &request.incident_id))?;

    request.apply_to(&mut incident, FALLBACK_UPDATED_DATE);
    Ok(incident)
}
