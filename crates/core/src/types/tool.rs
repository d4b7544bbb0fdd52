use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

// =============================================================================
// Tool Types
// =============================================================================

/// Upper bound on `limit` for every search tool.
pub const MAX_LIMIT: usize = 100;

/// Default `limit` for search tools.
pub(crate) fn default_limit() -> usize {
    10
}

/// Reject blank required fields before any remote call.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn check_limit(limit: usize) -> Result<()> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(Error::invalid_request(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(())
}

/// Which execution tier produced a broker result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// The remote adapter answered.
    Remote,
    /// The embedded fallback dataset answered.
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broker payload tagged with the tier that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub payload: T,
    pub provenance: Provenance,
}

impl<T> Sourced<T> {
    pub fn remote(payload: T) -> Self {
        Self {
            payload,
            provenance: Provenance::Remote,
        }
    }

    pub fn fallback(payload: T) -> Self {
        Self {
            payload,
            provenance: Provenance::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }

    /// Transform the payload, keeping the provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            payload: f(self.payload),
            provenance: self.provenance,
        }
    }
}

/// Output from a JSON tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the tool execution was successful.
    pub success: bool,

    /// Short human-readable summary.
    pub content: String,

    /// Structured result.
    pub data: Option<serde_json::Value>,
}

impl ToolOutput {
    /// Create a successful text output.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            data: None,
        }
    }

    /// Attach structured data.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Create a failed output.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: message.into(),
            data: None,
        }
    }
}

/// Tool definition for the tool registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// JSON Schema for tool arguments.
    pub parameters: serde_json::Value,
}

// =============================================================================
// Health Check Tool
// =============================================================================

/// Health check takes no arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HealthCheckRequest {}

/// Reachability of one remote adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
}

/// Aggregate broker health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// `healthy` when every adapter answered, `degraded` otherwise.
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub components: Vec<ComponentHealth>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds() {
        assert!(check_limit(1).is_ok());
        assert!(check_limit(MAX_LIMIT).is_ok());
        assert!(matches!(check_limit(0), Err(Error::InvalidRequest(_))));
        assert!(matches!(check_limit(MAX_LIMIT + 1), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_sourced_map_keeps_provenance() {
        let sourced = Sourced::fallback(2).map(|n| n * 21);
        assert_eq!(sourced.payload, 42);
        assert!(sourced.is_fallback());
    }
}
