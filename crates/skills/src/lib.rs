#![deny(unused)]
//! Tool broker for Super Tools.
//!
//! This crate provides:
//! - HTTP clients for the incident and observability adapters
//! - The two-tier tool broker (remote call, then embedded fallback)
//! - Embedded fallback datasets
//! - Named JSON tools and a registry to look them up

pub mod adapters;
pub mod broker;
pub mod fallback;
pub mod registry;
pub mod tools;

pub use adapters::{HttpIncidentAdapter, HttpObservabilityAdapter};
pub use broker::{ToolBroker, DEFAULT_TIMEOUT};
pub use registry::{create_broker_registry, DefaultToolRegistry};
pub use tools::{broker_tools, BrokerOperation, BrokerTool};
