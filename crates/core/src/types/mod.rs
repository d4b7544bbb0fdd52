//! Core type definitions for Super Tools.
//!
//! This module contains the data structures that flow through one routing
//! cycle: the inbound message, the classified intent, the tool request/result
//! pairs, and the agent response.

pub mod agent;
pub mod correlation;
pub mod incident;
pub mod intent;
pub mod observability;
pub mod request;
pub mod tool;

pub use agent::*;
pub use correlation::*;
pub use incident::*;
pub use intent::*;
pub use observability::*;
pub use request::*;
pub use tool::*;
