use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Agent Result Types
// =============================================================================

/// Output of one routing cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Human-readable reply.
    pub message: String,

    /// Whether the agent fulfilled the request.
    pub success: bool,

    /// Machine-readable detail (answering tool, provenance, error).
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl AgentResponse {
    /// Create a successful response.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            data: Map::new(),
        }
    }

    /// Create a failed response carrying the error description.
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("error".into(), Value::String(error.into()));
        Self {
            message: message.into(),
            success: false,
            data,
        }
    }

    /// Attach one data field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Read a string data field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_carries_error() {
        let response = AgentResponse::failure("Sorry", "adapter down").with("intent", "itsm");
        assert!(!response.success);
        assert_eq!(response.get_str("error"), Some("adapter down"));
        assert_eq!(response.get_str("intent"), Some("itsm"));
    }
}
