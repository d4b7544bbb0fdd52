use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Intent Types (Classifier Output)
// =============================================================================

/// Topic category of an inbound message.
///
/// Classification never fails: anything the keyword sets do not cover
/// degrades to [`Intent::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Metrics, assets and server health.
    Observability,
    /// Incident management.
    Itsm,
    /// Greetings and help requests.
    General,
    /// Nothing matched.
    Unknown,
}

impl Intent {
    /// All intents in classification priority order.
    pub const ALL: [Intent; 4] = [
        Intent::Observability,
        Intent::Itsm,
        Intent::General,
        Intent::Unknown,
    ];

    /// Stable lowercase label used in logs and response data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observability => "observability",
            Self::Itsm => "itsm",
            Self::General => "general",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_label() {
        for intent in Intent::ALL {
            let json = serde_json::to_value(intent).unwrap();
            assert_eq!(json, serde_json::json!(intent.as_str()));
        }
    }
}
