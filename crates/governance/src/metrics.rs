//! Prometheus metrics for the gateway, tool broker and agent router.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use super_tools_core::{Error, Intent, Provenance, Result};

pub const HTTP_REQUESTS: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
pub const TOOL_CALLS: &str = "tool_calls_total";
pub const TOOL_CALL_DURATION: &str = "tool_call_duration_seconds";
pub const TOOL_FALLBACKS: &str = "tool_fallbacks_total";
pub const AGENT_RESPONSES: &str = "agent_responses_total";

/// Install the Prometheus recorder and describe every series this service
/// emits.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| Error::governance(format!("Failed to install Prometheus recorder: {}", e)))?;

    describe_counter!(HTTP_REQUESTS, "Gateway requests by method, route and status");
    describe_histogram!(HTTP_REQUEST_DURATION, Unit::Seconds, "Gateway request latency");
    describe_counter!(TOOL_CALLS, "Answered tool calls by tool and provenance");
    describe_histogram!(TOOL_CALL_DURATION, Unit::Seconds, "Tool call latency, fallback included");
    describe_counter!(TOOL_FALLBACKS, "Remote failures answered from the fallback dataset");
    describe_counter!(AGENT_RESPONSES, "Routed messages by intent and outcome");

    tracing::info!("Prometheus metrics recorder initialized");
    Ok(handle)
}

/// Record one HTTP request (count and latency).
pub fn track_request(method: &str, path: &str, status: u16, latency_sec: f64) {
    metrics::counter!(
        HTTP_REQUESTS,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        HTTP_REQUEST_DURATION,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(latency_sec);
}

/// Record a tool call that produced a payload, tagged with the tier that
/// answered it.
pub fn track_tool_call(tool: &'static str, provenance: Provenance, latency_sec: f64) {
    metrics::counter!(TOOL_CALLS, "tool" => tool, "provenance" => provenance.as_str())
        .increment(1);
    metrics::histogram!(TOOL_CALL_DURATION, "tool" => tool).record(latency_sec);
}

/// Record a remote failure that sent a tool call to the fallback dataset.
pub fn track_fallback(tool: &'static str, error: &Error) {
    let reason = match error {
        Error::Timeout(_) => "timeout",
        _ => "adapter",
    };
    metrics::counter!(TOOL_FALLBACKS, "tool" => tool, "reason" => reason).increment(1);
}

/// Record one routed message.
pub fn track_intent(intent: Intent, success: bool) {
    metrics::counter!(
        AGENT_RESPONSES,
        "intent" => intent.as_str(),
        "success" => if success { "true" } else { "false" }
    )
    .increment(1);
}
