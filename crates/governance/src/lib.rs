#![deny(unused)]
//! Ambient concerns for Super Tools.
//!
//! This crate provides:
//! - Tracing subscriber setup with optional OTLP export
//! - Prometheus metrics
//! - The bearer credential check used by the channel gateway

pub mod auth;
pub mod metrics;
pub mod tracing_layer;

pub use auth::{bearer_token, BearerValidator};
pub use metrics::{
    setup_metrics_recorder, track_fallback, track_intent, track_request, track_tool_call,
};
pub use tracing_layer::configure_tracing;
