//! Greeting and capability summary. Also answers unknown intents.

use async_trait::async_trait;

use super_tools_core::{
    traits::Agent,
    types::{AgentResponse, Intent, Message, RoutingContext},
};

/// Fixed capability summary.
pub const CAPABILITIES: &str = "Hello! I am the Super Tools agent, your assistant for support and operations.

I can help with:

Monitoring and observability:
- CPU, memory and disk metrics
- Server status
- System performance

Incident management:
- Open new incidents
- Check incident status
- Update incidents
- Resolve incidents

Try for example:
- \"What is the CPU of server-01?\"
- \"Open an incident for the database problem\"
- \"Resolve INC0001 resolution: restarted the service\"

What would you like to do today?";

/// Stateless agent that always succeeds.
#[derive(Debug, Default)]
pub struct GeneralAgent;

impl GeneralAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for GeneralAgent {
    fn name(&self) -> &str {
        "general"
    }

    async fn process(&self, _message: &Message, context: &RoutingContext) -> AgentResponse {
        tracing::debug!(correlation_id = %context.correlation_id, "Answering with capabilities");
        AgentResponse::ok(CAPABILITIES).with("intent", Intent::General.as_str())
    }
}
