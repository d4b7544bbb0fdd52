use super::correlation::CorrelationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Message Types
// =============================================================================

/// Inbound unit of work: one free-text message from a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Raw message text.
    pub text: String,

    /// Channel the message arrived on (chat, web, app).
    pub channel: Option<String>,

    /// User identifier.
    pub user_id: Option<String>,

    /// Session identifier.
    pub session_id: Option<String>,

    /// Opaque caller metadata.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Message {
    /// Create a message with text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the user identifier.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Lower-cased text, the form every keyword test runs against.
    pub fn lowercase(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Per-cycle context handed from the channel to the router and agents.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// Correlation id propagated to logs and outbound calls.
    pub correlation_id: CorrelationId,
}

impl RoutingContext {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self { correlation_id }
    }
}

impl Default for RoutingContext {
    fn default() -> Self {
        Self::new(CorrelationId::new())
    }
}
