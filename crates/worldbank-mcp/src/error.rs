//! Error types for the MCP handlers
//!
//! Two layers live here:
//! - [`McpError`]: protocol-level faults serialized as JSON-RPC error objects
//!   (unknown method, unknown resource/tool identifier, bad params).
//! - [`HandlerError`]: per-request failures. These are always converted into
//!   an [`ErrorPayload`] (`{"error": ..., "details": ..., "country": ...}`) and
//!   returned as a normal result, never as a protocol fault.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for protocol-level operations
pub type Result<T> = std::result::Result<T, McpError>;

/// JSON-RPC "parse error"
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC "method not found"
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC "invalid params"
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC "internal error"
pub const INTERNAL_ERROR: i32 = -32603;

/// Protocol-level fault reported to the client as a JSON-RPC error object
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[error("{message}")]
pub struct McpError {
    /// JSON-RPC error code (e.g., -32601, -32602)
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Additional error context (e.g., the rejected identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpError {
    /// Create a new error with a code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Add context information as JSON
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// A line on the transport that is not valid JSON
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, "Parse error").with_data(json!({ "reason": reason.into() }))
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        let method = method.into();
        Self::new(METHOD_NOT_FOUND, format!("Unknown method: {}", method))
            .with_data(json!({ "method": method }))
    }

    /// Invalid parameter error
    pub fn invalid_params(param: impl Into<String>, reason: impl Into<String>) -> Self {
        let p = param.into();
        Self::new(INVALID_PARAMS, format!("Invalid parameter: {}", p)).with_data(json!({
            "parameter": p,
            "reason": reason.into()
        }))
    }

    /// Resource URI that does not name any resource handler
    pub fn unknown_resource(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self::new(INVALID_PARAMS, format!("Unknown resource: {}", uri))
            .with_data(json!({ "uri": uri }))
    }

    /// Tool name that does not name any tool handler
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(INVALID_PARAMS, format!("Unknown tool: {}", name))
            .with_data(json!({ "name": name }))
    }

    /// Internal server error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(
            INTERNAL_ERROR,
            format!("Internal server error: {}", reason.into()),
        )
    }

    /// JSON-RPC `error` member for this fault
    pub fn to_json_rpc(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({"code": self.code, "message": self.message}))
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::internal(err.to_string())
    }
}

/// Per-request failure of a resource or tool handler
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HandlerError {
    /// A required argument is missing or blank.
    #[error("{field} is required.")]
    Validation { field: &'static str },

    /// The local dataset has no rows for this (normalized) code.
    #[error("Country code '{code}' not found.")]
    NotFoundInLocalData { code: String },

    /// The upstream service explicitly reported that the entity does not exist.
    #[error("{message}")]
    UpstreamNotFound { message: String },

    #[error("Unexpected API error.")]
    UpstreamUnavailable { details: String },

    #[error("{message}")]
    MalformedUpstreamResponse {
        message: String,
        details: Option<String>,
    },

    /// The lookup worked but the requested observation is absent or has no value.
    #[error("{message}")]
    NoObservation { message: String },

    /// A handler task failed unexpectedly.
    #[error("Couldn't retrieve data.")]
    Internal { details: String },
}

impl HandlerError {
    pub fn country_not_found(code: &str) -> Self {
        HandlerError::UpstreamNotFound {
            message: format!("Country code '{}' not found.", code),
        }
    }

    pub fn invalid_lookup(code: &str, indicator: &str) -> Self {
        HandlerError::UpstreamNotFound {
            message: format!(
                "Invalid country code or indicator: '{}', '{}'.",
                code, indicator
            ),
        }
    }

    pub fn no_data_for_year(year: i32) -> Self {
        HandlerError::NoObservation {
            message: format!("No data available for year {}.", year),
        }
    }

    pub fn no_reported_value(indicator: &str, year: i32) -> Self {
        HandlerError::NoObservation {
            message: format!("Indicator '{}' has no reported value for {}.", indicator, year),
        }
    }

    /// Supplementary detail, when the failure carries one
    pub fn details(&self) -> Option<&str> {
        match self {
            HandlerError::UpstreamUnavailable { details } | HandlerError::Internal { details } => {
                Some(details.as_str())
            }
            HandlerError::MalformedUpstreamResponse { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
            details: self.details().map(str::to_string),
            country: None,
        }
    }
}

/// Structured error body returned in place of a successful result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Originating country code, set for per-country batch entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ErrorPayload {
    pub fn with_country(mut self, code: impl Into<String>) -> Self {
        self.country = Some(code.into());
        self
    }
}

impl From<HandlerError> for ErrorPayload {
    fn from(err: HandlerError) -> Self {
        err.to_payload()
    }
}
