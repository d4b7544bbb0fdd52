#![deny(unused)]
//! Agent layer for Super Tools.
//!
//! This crate provides the keyword intent classifier, the domain agents and
//! the router that ties them together.

pub mod agents;
pub mod classifier;
pub mod router;

pub use agents::{GeneralAgent, ItsmAgent, ObservabilityAgent};
pub use classifier::KeywordClassifier;
pub use router::AgentRouter;
