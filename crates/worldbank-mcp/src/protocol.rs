//! JSON-RPC 2.0 message handling for the MCP methods
//!
//! [`handle_message`] turns one decoded request into at most one response.
//! Transport (line framing, stdio, shutdown) lives in the binary.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::dispatch::{call_tool, read_resource, ResourceId, ToolId};
use crate::error::{McpError, Result};
use crate::server::{McpServerState, JSON_MIME};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "world-bank-server";

/// Handle one JSON-RPC message
///
/// Returns `None` for notifications (messages without an `id`), which never
/// get a reply.
pub async fn handle_message(state: &McpServerState, message: &Value) -> Option<Value> {
    let method = message.get("method").and_then(Value::as_str).unwrap_or("");
    let params = message.get("params").cloned().unwrap_or(Value::Null);

    let Some(id) = message.get("id").cloned() else {
        debug!(method, "received notification");
        return None;
    };

    debug!(method, %id, "received request");

    let response = match handle_request(state, method, params).await {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err(err) => {
            warn!(method, code = err.code, "request failed: {}", err.message);
            json!({"jsonrpc": "2.0", "id": id, "error": err.to_json_rpc()})
        }
    };
    Some(response)
}

/// Reply for a message that could not be decoded at all
pub fn parse_error_response(reason: impl Into<String>) -> Value {
    json!({"jsonrpc": "2.0", "id": Value::Null, "error": McpError::parse_error(reason).to_json_rpc()})
}

async fn handle_request(state: &McpServerState, method: &str, params: Value) -> Result<Value> {
    match method {
        "initialize" => {
            info!("Client initializing");
            Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
                "capabilities": {"tools": {}, "resources": {}}
            }))
        }
        "ping" => Ok(json!({})),
        "resources/list" => Ok(json!({"resources": state.resources()})),
        "resources/templates/list" => {
            Ok(json!({"resourceTemplates": state.resource_templates()}))
        }
        "resources/read" => {
            let uri = params
                .get("uri")
                .and_then(Value::as_str)
                .ok_or_else(|| McpError::invalid_params("uri", "a resource URI string is required"))?;
            let resource: ResourceId = uri.parse()?;
            let text = read_resource(state, &resource).await?;
            Ok(json!({
                "contents": [{"uri": uri, "mimeType": JSON_MIME, "text": text}]
            }))
        }
        "tools/list" => Ok(json!({"tools": state.tools()})),
        "tools/call" => {
            let name = params
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| McpError::invalid_params("name", "a tool name string is required"))?;
            let tool: ToolId = name.parse()?;
            let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
            let value = call_tool(state, tool, arguments).await?;
            Ok(json!({
                "content": [{"type": "text", "text": serde_json::to_string_pretty(&value)?}],
                "isError": false
            }))
        }
        other => Err(McpError::method_not_found(other)),
    }
}
