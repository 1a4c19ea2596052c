//! # Fundraiser payment server
//! This module hosts the HTTP surface for the fundraiser payment engine. It is responsible for:
//! Opening gateway orders for new contributions and persisting the pending record.
//! Reconciling the gateway's signed payment confirmations and failure notifications.
//! Serving the aggregate tally and contribution history for the live dashboard.
//! Streaming lifecycle events to connected dashboards as Server-Sent Events.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod live;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
