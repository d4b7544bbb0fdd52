//! Agent router: classify, then dispatch to the agent owning the intent.

use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use super_tools_core::{
    traits::{Agent, IntentClassifier},
    types::{AgentResponse, Intent, Message, RoutingContext},
};
use super_tools_governance::track_intent;
use super_tools_skills::ToolBroker;

use crate::agents::{GeneralAgent, ItsmAgent, ObservabilityAgent};
use crate::classifier::KeywordClassifier;

const APOLOGY: &str = "Sorry, something unexpected happened while handling your message. Please try again.";

/// Dispatches messages to domain agents.
///
/// Holds no per-call state and may be shared across tasks. Intents without a
/// registered agent, `Unknown` included, go to the fallback agent.
pub struct AgentRouter {
    classifier: Arc<dyn IntentClassifier>,
    agents: HashMap<Intent, Arc<dyn Agent>>,
    fallback: Arc<dyn Agent>,
}

impl AgentRouter {
    /// Create a router with no domain agents.
    pub fn new(classifier: Arc<dyn IntentClassifier>, fallback: Arc<dyn Agent>) -> Self {
        Self {
            classifier,
            agents: HashMap::new(),
            fallback,
        }
    }

    /// Register the agent for an intent.
    pub fn with_agent(mut self, intent: Intent, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(intent, agent);
        self
    }

    /// Standard wiring: keyword classifier, the three domain agents over one
    /// broker, general agent as fallback.
    pub fn with_broker(broker: Arc<ToolBroker>) -> Self {
        let general: Arc<dyn Agent> = Arc::new(GeneralAgent::new());
        Self::new(Arc::new(KeywordClassifier::new()), general.clone())
            .with_agent(
                Intent::Observability,
                Arc::new(ObservabilityAgent::new(broker.clone())),
            )
            .with_agent(Intent::Itsm, Arc::new(ItsmAgent::new(broker)))
            .with_agent(Intent::General, general)
    }

    /// Classify only.
    pub fn classify(&self, text: &str) -> Intent {
        self.classifier.classify(text)
    }

    /// Route a message and report the intent it was classified as.
    pub async fn dispatch(
        &self,
        message: &Message,
        context: &RoutingContext,
    ) -> (Intent, AgentResponse) {
        let intent = self.classifier.classify(&message.text);
        let agent = self.agents.get(&intent).unwrap_or(&self.fallback);

        tracing::info!(
            correlation_id = %context.correlation_id,
            intent = %intent,
            agent = agent.name(),
            "Routing message"
        );

        let response = match AssertUnwindSafe(agent.process(message, context))
            .catch_unwind()
            .await
        {
            Ok(response) => response,
            Err(panic) => {
                let detail = panic_detail(panic.as_ref());
                tracing::error!(
                    correlation_id = %context.correlation_id,
                    agent = agent.name(),
                    error = %detail,
                    "Agent panicked"
                );
                AgentResponse::failure(APOLOGY, detail).with("intent", intent.as_str())
            }
        };

        track_intent(intent, response.success);

        (intent, response)
    }

    /// Route a message. Always yields exactly one response.
    pub async fn route(&self, message: &Message, context: &RoutingContext) -> AgentResponse {
        self.dispatch(message, context).await.1
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("agent panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("agent panicked: {}", s)
    } else {
        "agent panicked".to_string()
    }
}
