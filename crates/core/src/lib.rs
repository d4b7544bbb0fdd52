#![deny(unused)]
//! Core types, traits, and error definitions for Super Tools.
//!
//! This crate provides the foundational building blocks shared across the
//! channel gateway, the agent layer, and the tool broker.

pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
