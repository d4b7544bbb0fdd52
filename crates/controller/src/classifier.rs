//! Keyword intent classifier.

use super_tools_core::{traits::IntentClassifier, types::Intent};

/// Observability terms, checked first.
pub const OBSERVABILITY_KEYWORDS: &[&str] = &[
    "cpu",
    "memória",
    "memory",
    "disco",
    "disk",
    "servidor",
    "server",
    "métrica",
    "metric",
    "monitor",
    "status",
    "performance",
    "load",
    "uptime",
    "ping",
    "latency",
    "throughput",
    "bandwidth",
];

/// Incident management terms, checked second.
pub const ITSM_KEYWORDS: &[&str] = &[
    "incidente",
    "incident",
    "ticket",
    "problema",
    "issue",
    "abrir",
    "create",
    "atualizar",
    "update",
    "resolver",
    "resolve",
    "fechar",
    "close",
    "status",
    "prioridade",
    "priority",
    "sla",
    "escalation",
];

/// Greeting and help terms, checked last.
pub const GENERAL_KEYWORDS: &[&str] = &["ajuda", "help", "oi", "olá", "hello", "hi", "ping"];

/// Classifies by substring membership in fixed keyword sets.
///
/// Sets are tested in priority order (observability, ITSM, general) and the
/// first set with any keyword contained in the lower-cased text wins. Matching
/// is on substrings, not words, so "translate" classifies as ITSM through
/// "sla". Overlapping terms such as "status" always resolve to the earlier set.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(Intent, &'static [&'static str])>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (Intent::Observability, OBSERVABILITY_KEYWORDS),
                (Intent::Itsm, ITSM_KEYWORDS),
                (Intent::General, GENERAL_KEYWORDS),
            ],
        }
    }

    /// The keyword that decided the classification, if any.
    pub fn matched_keyword(&self, text: &str) -> Option<(Intent, &'static str)> {
        let lower = text.to_lowercase();
        self.rules.iter().find_map(|(intent, keywords)| {
            keywords
                .iter()
                .find(|keyword| lower.contains(*keyword))
                .map(|keyword| (*intent, *keyword))
        })
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Intent {
        let intent = self
            .matched_keyword(text)
            .map(|(intent, _)| intent)
            .unwrap_or(Intent::Unknown);

        tracing::debug!(intent = %intent, text_length = text.len(), "Classified message");
        intent
    }
}
