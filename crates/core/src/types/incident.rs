use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::tool::{check_limit, default_limit, require_non_blank};
use crate::Result;

// =============================================================================
// Incident Tool Types
// =============================================================================

/// Status assigned to every newly created incident.
pub const STATUS_NEW: &str = "New";

/// Status that triggers the default resolution note.
pub const STATUS_RESOLVED: &str = "Resolved";

/// Resolution written when an incident is resolved without one.
pub const DEFAULT_RESOLUTION: &str = "Resolved via API";

/// An incident record as the incident adapter reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub priority: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub requester: String,
    #[serde(default)]
    pub assigned_group: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

/// `itsm_search_incidents` input.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchIncidentsRequest {
    /// Substring matched against title and description; empty matches all.
    #[serde(default)]
    pub query: String,
    /// Exact status filter (case-insensitive).
    #[serde(default)]
    pub status: Option<String>,
    /// Exact priority filter (case-insensitive).
    #[serde(default)]
    pub priority: Option<String>,
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SearchIncidentsRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status: None,
            priority: None,
            limit: default_limit(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_limit(self.limit)
    }
}

/// `itsm_search_incidents` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentSearchResult {
    pub incidents: Vec<Incident>,
    /// Matches before `limit` was applied.
    pub total_count: usize,
    #[serde(default)]
    pub query: String,
}

/// `itsm_create_incident` input.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateIncidentRequest {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub category: String,
    pub requester: String,
}

impl CreateIncidentRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("title", &self.title)?;
        require_non_blank("description", &self.description)?;
        require_non_blank("priority", &self.priority)?;
        require_non_blank("category", &self.category)?;
        require_non_blank("requester", &self.requester)
    }
}

/// `itsm_update_incident` input.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateIncidentRequest {
    pub incident_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl UpdateIncidentRequest {
    pub fn new(incident_id: impl Into<String>) -> Self {
        Self {
            incident_id: incident_id.into(),
            status: None,
            priority: None,
            resolution: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank("incident_id", &self.incident_id)
    }

    /// Apply this update to a record the way the incident adapter does,
    /// including the default resolution for `Resolved`.
    pub fn apply_to(&self, incident: &mut Incident, updated_date: impl Into<String>) {
        if let Some(status) = &self.status {
            incident.status = status.clone();
        }
        if let Some(priority) = &self.priority {
            incident.priority = priority.clone();
        }
        if let Some(resolution) = &self.resolution {
            incident.resolution = Some(resolution.clone());
        }
        incident.updated_date = Some(updated_date.into());

        let unresolved = incident
            .resolution
            .as_deref()
            .map_or(true, |r| r.trim().is_empty());
        if self.status.as_deref() == Some(STATUS_RESOLVED) && unresolved {
            incident.resolution = Some(DEFAULT_RESOLUTION.to_string());
        }
    }
}

/// Body sent to `PUT /incidents/{id}`: the update without its path id.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<&'a str>,
}

impl<'a> From<&'a UpdateIncidentRequest> for IncidentPatch<'a> {
    fn from(req: &'a UpdateIncidentRequest) -> Self {
        Self {
            status: req.status.as_deref(),
            priority: req.priority.as_deref(),
            resolution: req.resolution.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Incident {
        Incident {
            incident_id: "INC0001".into(),
            title: "Database Connection Timeout".into(),
            description: "slow".into(),
            status: "Assigned".into(),
            priority: "High".into(),
            category: "Database".into(),
            requester: "john.doe@company.com".into(),
            assigned_group: None,
            created_date: None,
            updated_date: None,
            resolution: None,
        }
    }

    #[test]
    fn test_resolve_without_resolution_autofills() {
        let mut incident = sample();
        UpdateIncidentRequest::new("INC0001")
            .with_status(STATUS_RESOLVED)
            .apply_to(&mut incident, "2025-09-29T12:00:00Z");
        assert_eq!(incident.status, STATUS_RESOLVED);
        assert_eq!(incident.resolution.as_deref(), Some(DEFAULT_RESOLUTION));
    }

    #[test]
    fn test_explicit_resolution_kept() {
        let mut incident = sample();
        UpdateIncidentRequest::new("INC0001")
            .with_status(STATUS_RESOLVED)
            .with_resolution("Restarted pool")
            .apply_to(&mut incident, "now");
        assert_eq!(incident.resolution.as_deref(), Some("Restarted pool"));
    }

    #[test]
    fn test_create_requires_every_field() {
        let req = CreateIncidentRequest {
            title: "Disk full".into(),
            description: "".into(),
            priority: "High".into(),
            category: "Storage".into(),
            requester: "ops".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let req = UpdateIncidentRequest::new("INC0001").with_priority("Low");
        let body = serde_json::to_value(IncidentPatch::from(&req)).unwrap();
        assert_eq!(body, serde_json::json!({"priority": "Low"}));
    }
}
