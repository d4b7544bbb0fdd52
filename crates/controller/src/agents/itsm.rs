//! ITSM agent: open, inspect, update and resolve incidents.

use async_trait::async_trait;
use std::sync::Arc;

use super_tools_core::{
    traits::Agent,
    types::{
        AgentResponse, CorrelationId, CreateIncidentRequest, Incident, Intent, Message,
        RoutingContext, SearchIncidentsRequest, UpdateIncidentRequest, MAX_LIMIT,
        STATUS_RESOLVED,
    },
    Error,
};
use super_tools_skills::broker::{
    ToolBroker, CREATE_INCIDENT, SEARCH_INCIDENTS, UPDATE_INCIDENT,
};

use super::{error_reply, find_incident_id, tokens, tool_reply};

const APOLOGY: &str =
    "Sorry, something went wrong while processing your incident request. Please try again.";

const HINT: &str = "I can help you:
- Open new incidents
- Check incident status
- Update existing incidents
- Resolve incidents

Which operation would you like?";

/// Status set by a plain update.
pub const STATUS_IN_PROGRESS: &str = "In Progress";

/// Requester used when the channel did not identify the user.
pub const ANONYMOUS_REQUESTER: &str = "anonymous";

/// Incidents shown when asking for status without an id.
const RECENT_LIMIT: usize = 5;

const TITLE_MAX_CHARS: usize = 80;

const RESOLUTION_MARKER: &str = "resolution:";

const PRIORITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Critical", &["critical", "crítico", "critico", "urgent", "urgente"]),
    ("High", &["high", "alta", "alto"]),
    ("Low", &["low", "baixa", "baixo"]),
];
const DEFAULT_PRIORITY: &str = "Medium";

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Network", &["network", "rede", "vpn", "dns"]),
    ("Database", &["database", "banco", "db", "postgres"]),
    ("Email", &["email", "e-mail", "mail"]),
    ("Infrastructure", &["server", "servidor", "disk", "disco"]),
    ("Application", &["app", "application", "aplicação", "aplicacao"]),
];
const DEFAULT_CATEGORY: &str = "General";

/// Incident operation requested by the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Status,
    Update,
    Resolve,
}

impl Action {
    const KEYWORDS: [(Action, &'static [&'static str]); 4] = [
        (Action::Create, &["create", "open", "abrir", "criar"]),
        (Action::Status, &["status"]),
        (Action::Update, &["update", "atualizar"]),
        (Action::Resolve, &["resolve", "resolver"]),
    ];

    fn detect(lower: &str) -> Option<Action> {
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(action, _)| *action)
    }
}

/// First table entry with a keyword among the message words.
fn pick(text: &str, table: &[(&'static str, &[&str])], default: &'static str) -> &'static str {
    let words: Vec<String> = tokens(text).map(str::to_lowercase).collect();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| words.iter().any(|w| w == *k)))
        .map_or(default, |(value, _)| *value)
}

/// Text after `resolution:`, if any.
fn resolution_note(text: &str) -> Option<String> {
    // ASCII lowering keeps byte offsets valid for `text`.
    let start = text.to_ascii_lowercase().find(RESOLUTION_MARKER)? + RESOLUTION_MARKER.len();
    let note = text[start..].trim();
    (!note.is_empty()).then(|| note.to_string())
}

fn incident_report(heading: &str, incident: &Incident) -> String {
    let mut report = format!(
        "{}\nIncident: {}\nTitle: {}\nStatus: {}\nPriority: {}",
        heading, incident.incident_id, incident.title, incident.status, incident.priority
    );
    if let Some(group) = &incident.assigned_group {
        report.push_str(&format!("\nAssigned group: {}", group));
    }
    if let Some(resolution) = &incident.resolution {
        report.push_str(&format!("\nResolution: {}", resolution));
    }
    report
}

/// Handles incident requests through the tool broker.
pub struct ItsmAgent {
    broker: Arc<ToolBroker>,
}

impl ItsmAgent {
    pub fn new(broker: Arc<ToolBroker>) -> Self {
        Self { broker }
    }

    /// Build the create request a message describes.
    fn create_request(message: &Message) -> CreateIncidentRequest {
        let text = message.text.trim();
        CreateIncidentRequest {
            title: text.chars().take(TITLE_MAX_CHARS).collect(),
            description: text.to_string(),
            priority: pick(text, PRIORITY_KEYWORDS, DEFAULT_PRIORITY).to_string(),
            category: pick(text, CATEGORY_KEYWORDS, DEFAULT_CATEGORY).to_string(),
            requester: message
                .user_id
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_REQUESTER.to_string()),
        }
    }

    async fn create(&self, message: &Message, correlation_id: &CorrelationId) -> AgentResponse {
        let request = Self::create_request(message);
        match self.broker.create_incident(&request, correlation_id).await {
            Ok(sourced) => tool_reply(
                Intent::Itsm,
                CREATE_INCIDENT,
                sourced.provenance,
                incident_report("Incident created", &sourced.payload),
            )
            .with("incident_id", sourced.payload.incident_id),
            Err(e) => error_reply(Intent::Itsm, CREATE_INCIDENT, APOLOGY, &e),
        }
    }

    async fn status(
        &self,
        incident_id: Option<String>,
        correlation_id: &CorrelationId,
    ) -> AgentResponse {
        // Incident search matches title and description only and has no
        // offset, so an id lookup scans the first MAX_LIMIT incidents. An id
        // past that window is reported as not found.
        let limit = if incident_id.is_some() { MAX_LIMIT } else { RECENT_LIMIT };
        let request = SearchIncidentsRequest::new("").with_limit(limit);
        let sourced = match self.broker.search_incidents(&request, correlation_id).await {
            Ok(sourced) => sourced,
            Err(e) => return error_reply(Intent::Itsm, SEARCH_INCIDENTS, APOLOGY, &e),
        };

        let Some(incident_id) = incident_id else {
            let result = &sourced.payload;
            let mut message = format!("Recent incidents ({} total)", result.total_count);
            for incident in &result.incidents {
                message.push_str(&format!(
                    "\n- {} [{}, {}] {}",
                    incident.incident_id, incident.status, incident.priority, incident.title
                ));
            }
            return tool_reply(Intent::Itsm, SEARCH_INCIDENTS, sourced.provenance, message);
        };

        match sourced
            .payload
            .incidents
            .iter()
            .find(|i| i.incident_id.eq_ignore_ascii_case(&incident_id))
        {
            Some(incident) => tool_reply(
                Intent::Itsm,
                SEARCH_INCIDENTS,
                sourced.provenance,
                incident_report("Incident status", incident),
            )
            .with("incident_id", incident.incident_id.clone()),
            None => error_reply(
                Intent::Itsm,
                SEARCH_INCIDENTS,
                APOLOGY,
                &Error::not_found("Incident", &incident_id),
            ),
        }
    }

    async fn update(
        &self,
        request: UpdateIncidentRequest,
        heading: &str,
        correlation_id: &CorrelationId,
    ) -> AgentResponse {
        match self.broker.update_incident(&request, correlation_id).await {
            Ok(sourced) => tool_reply(
                Intent::Itsm,
                UPDATE_INCIDENT,
                sourced.provenance,
                incident_report(heading, &sourced.payload),
            )
            .with("incident_id", sourced.payload.incident_id),
            Err(e) => error_reply(Intent::Itsm, UPDATE_INCIDENT, APOLOGY, &e),
        }
    }
}

/// No tool runs, so the reply carries no `tool` entry.
fn missing_id(verb: &str) -> AgentResponse {
    AgentResponse::failure(
        format!("Please tell me which incident to {}, for example INC0001.", verb),
        "incident_id is required",
    )
    .with("intent", Intent::Itsm.as_str())
}

#[async_trait]
impl Agent for ItsmAgent {
    fn name(&self) -> &str {
        "itsm"
    }

    async fn process(&self, message: &Message, context: &RoutingContext) -> AgentResponse {
        let correlation_id = &context.correlation_id;
        let Some(action) = Action::detect(&message.lowercase()) else {
            return AgentResponse::ok(HINT).with("intent", Intent::Itsm.as_str());
        };
        let incident_id = find_incident_id(&message.text);

        tracing::info!(
            correlation_id = %correlation_id,
            action = ?action,
            incident_id = ?incident_id,
            "Processing incident request"
        );

        match (action, incident_id) {
            (Action::Create, _) => self.create(message, correlation_id).await,
            (Action::Status, incident_id) => self.status(incident_id, correlation_id).await,
            (Action::Update, None) => missing_id("update"),
            (Action::Resolve, None) => missing_id("resolve"),
            (Action::Update, Some(id)) => {
                let request = UpdateIncidentRequest::new(id).with_status(STATUS_IN_PROGRESS);
                self.update(request, "Incident updated", correlation_id).await
            }
            (Action::Resolve, Some(id)) => {
                let mut request = UpdateIncidentRequest::new(id).with_status(STATUS_RESOLVED);
                if let Some(note) = resolution_note(&message.text) {
                    request = request.with_resolution(note);
                }
                self.update(request, "Incident resolved", correlation_id).await
            }
        }
    }
}
