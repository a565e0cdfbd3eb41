//! MCP (Model Context Protocol) handlers for the World Bank data gateway
//!
//! This crate maps protocol-level resource and tool identifiers onto typed
//! handlers over the local indicator dataset and the two upstream APIs.
//!
//! # Architecture
//!
//! The crate is organized into the following submodules:
//! - `server`: Shared handler state (dataset + upstream sources) and descriptors
//! - `resources`: Resource handlers (`schema`, `countries`, `indicators/{code}`)
//! - `tools`: Tool handlers (`get_country_info`, `get_live_indicator`, `compare_countries`)
//! - `dispatch`: Closed enums of handler identifiers and the routing between them
//! - `protocol`: JSON-RPC 2.0 message handling on top of `dispatch`
//! - `types`: Tool inputs/outputs with JSON Schema generation
//! - `error`: Protocol faults and per-request error payloads
//!
//! # Error contract
//!
//! Per-request failures (validation, not found, upstream trouble) never become
//! protocol faults: handlers turn them into `{"error": ...}` payloads inside a
//! successful response. Only unknown identifiers and undecodable arguments are
//! reported as JSON-RPC errors.

pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use dispatch::{HandlerId, ResourceId, ToolId};
pub use error::{ErrorPayload, HandlerError, McpError, Result};
pub use server::McpServerState;
