#![deny(unused)]
//! Channel gateway for Super Tools.
//!
//! This crate provides the HTTP entry point: it attaches a correlation id to
//! every request, checks the bearer credential and hands messages to the
//! agent router.

pub mod error;
pub mod middleware;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayConfig, GatewayServer, MessageRequest, MessageResponse};
