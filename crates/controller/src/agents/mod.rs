//! Domain agents, one per intent.

pub mod general;
pub mod itsm;
pub mod observability;

pub use general::GeneralAgent;
pub use itsm::ItsmAgent;
pub use observability::ObservabilityAgent;

use super_tools_core::{
    types::{AgentResponse, Intent, Provenance},
    Error,
};

/// Split text into words with surrounding punctuation removed.
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-'))
        .filter(|word| !word.is_empty())
}

/// First word shaped like an asset id: a name, a hyphen, then a number
/// (`server-02`, `db-01`, `web-app-3`). Dates and ranges do not qualify.
pub(crate) fn find_asset_id(text: &str) -> Option<String> {
    tokens(text).find(|word| is_asset_id(word)).map(str::to_lowercase)
}

fn is_asset_id(word: &str) -> bool {
    let Some((name, number)) = word.rsplit_once('-') else {
        return false;
    };
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}

/// First word starting with `INC`, upper-cased.
pub(crate) fn find_incident_id(text: &str) -> Option<String> {
    tokens(text)
        .find(|word| {
            word.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("inc"))
                && word.chars().any(|c| c.is_ascii_digit())
        })
        .map(str::to_uppercase)
}

/// Success reply tagged with the tool and tier that produced it.
pub(crate) fn tool_reply(
    intent: Intent,
    tool: &str,
    provenance: Provenance,
    message: String,
) -> AgentResponse {
    AgentResponse::ok(message)
        .with("intent", intent.as_str())
        .with("tool", tool)
        .with("provenance", provenance.as_str())
}

/// Failure reply for a broker error. Not-found gets its own wording; every
/// other error gets the agent's apology.
pub(crate) fn error_reply(intent: Intent, tool: &str, apology: &str, error: &Error) -> AgentResponse {
    let response = if error.is_not_found() {
        AgentResponse::failure(format!("{}.", error), error.to_string()).with("not_found", true)
    } else {
        AgentResponse::failure(apology, error.to_string())
    };
    response.with("intent", intent.as_str()).with("tool", tool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_asset_id() {
        assert_eq!(find_asset_id("cpu of server-02?"), Some("server-02".into()));
        assert_eq!(find_asset_id("Disk on DB-01, please"), Some("db-01".into()));
        assert_eq!(find_asset_id("e-mail cpu"), None);
        assert_eq!(find_asset_id("cpu usage"), None);
        assert_eq!(find_asset_id("load on web-app-3"), Some("web-app-3".into()));
    }

    #[test]
    fn test_dates_and_ranges_are_not_asset_ids() {
        assert_eq!(find_asset_id("cpu usage since 2024-01-15"), None);
        assert_eq!(find_asset_id("disk between 10-20 percent"), None);
        assert_eq!(find_asset_id("cpu of server-0x"), None);
        assert_eq!(find_asset_id("memory since 2024-01-15 on db-01"), Some("db-01".into()));
    }

    #[test]
    fn test_find_incident_id() {
        assert_eq!(find_incident_id("status of INC0001"), Some("INC0001".into()));
        assert_eq!(find_incident_id("resolve inc-001234."), Some("INC-001234".into()));
        assert_eq!(find_incident_id("incident INC0002 again"), Some("INC0002".into()));
        assert_eq!(find_incident_id("an incident happened"), None);
    }
}
