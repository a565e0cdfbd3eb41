//! Handler identifiers and routing
//!
//! Every resource URI and tool name the server answers to is a variant of a
//! closed enum. Identifiers are parsed up front, so an unknown URI or tool
//! name is rejected as a protocol fault before any handler runs.

use std::fmt;
use std::str::FromStr;

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{McpError, Result};
use crate::resources::{CountriesResource, IndicatorsResource, SchemaResource};
use crate::server::McpServerState;
use crate::tools::{CompareCountriesTool, CountryInfoTool, LiveIndicatorTool};
use crate::types::{
    CompareCountriesInput, CountryInfoInput, LiveIndicatorInput, ToolResponse,
};

/// A readable resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Schema,
    Countries,
    /// Rows for one country; the code is kept as given and normalized by the handler.
    Indicators(String),
}

impl ResourceId {
    pub const SCHEMA_URI: &'static str = "data://schema";
    pub const COUNTRIES_URI: &'static str = "data://countries";
    pub const INDICATORS_TEMPLATE: &'static str = "data://indicators/{country_code}";

    const INDICATORS_PREFIX: &'static str = "data://indicators/";

    /// The concrete URI naming this resource
    pub fn uri(&self) -> String {
        match self {
            ResourceId::Schema => Self::SCHEMA_URI.to_string(),
            ResourceId::Countries => Self::COUNTRIES_URI.to_string(),
            ResourceId::Indicators(code) => format!("{}{}", Self::INDICATORS_PREFIX, code),
        }
    }
}

impl FromStr for ResourceId {
    type Err = McpError;

    fn from_str(uri: &str) -> Result<Self> {
        match uri {
            Self::SCHEMA_URI => Ok(ResourceId::Schema),
            Self::COUNTRIES_URI => Ok(ResourceId::Countries),
            _ => match uri.strip_prefix(Self::INDICATORS_PREFIX) {
                Some(code) if !code.is_empty() && !code.contains('/') => {
                    Ok(ResourceId::Indicators(code.to_string()))
                }
                _ => Err(McpError::unknown_resource(uri)),
            },
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// A callable tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    CountryInfo,
    LiveIndicator,
    CompareCountries,
}

fn input_schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
}

impl ToolId {
    /// Every tool, in the order `tools/list` reports them
    pub const ALL: [ToolId; 3] = [
        ToolId::CountryInfo,
        ToolId::LiveIndicator,
        ToolId::CompareCountries,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolId::CountryInfo => "get_country_info",
            ToolId::LiveIndicator => "get_live_indicator",
            ToolId::CompareCountries => "compare_countries",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolId::CountryInfo => {
                "Get detailed information about a country: name, capital, region, languages, currencies, population and flag."
            }
            ToolId::LiveIndicator => {
                "Get the live World Bank value of an indicator for one country and year (default 2022)."
            }
            ToolId::CompareCountries => {
                "Compare one World Bank indicator across several countries for a given year (default 2022)."
            }
        }
    }

    /// JSON Schema of the tool's arguments
    pub fn input_schema(&self) -> Value {
        match self {
            ToolId::CountryInfo => input_schema_of::<CountryInfoInput>(),
            ToolId::LiveIndicator => input_schema_of::<LiveIndicatorInput>(),
            ToolId::CompareCountries => input_schema_of::<CompareCountriesInput>(),
        }
    }
}

impl FromStr for ToolId {
    type Err = McpError;

    fn from_str(name: &str) -> Result<Self> {
        ToolId::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| McpError::unknown_tool(name))
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any handler the server can route to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerId {
    Resource(ResourceId),
    Tool(ToolId),
}

/// Read a resource and return its serialized body
pub async fn read_resource(state: &McpServerState, resource: &ResourceId) -> Result<String> {
    debug!(uri = %resource, "reading resource");
    match resource {
        ResourceId::Schema => SchemaResource::read(state).await,
        ResourceId::Countries => CountriesResource::read(state).await,
        ResourceId::Indicators(code) => IndicatorsResource::read(state, code).await,
    }
}

fn decode_arguments<T: DeserializeOwned>(tool: ToolId, arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments)
        .map_err(|err| McpError::invalid_params(format!("{}.arguments", tool.name()), err.to_string()))
}

/// Call a tool and return its result (a success body or an error payload)
///
/// Only undecodable arguments are an `Err`; handler failures come back as
/// `{"error": ...}` values.
pub async fn call_tool(state: &McpServerState, tool: ToolId, arguments: Value) -> Result<Value> {
    debug!(tool = %tool, "calling tool");
    let value = match tool {
        ToolId::CountryInfo => {
            let input: CountryInfoInput = decode_arguments(tool, arguments)?;
            let response: ToolResponse<_> = CountryInfoTool::execute(state, input).await.into();
            serde_json::to_value(response)?
        }
        ToolId::LiveIndicator => {
            let input: LiveIndicatorInput = decode_arguments(tool, arguments)?;
            let response: ToolResponse<_> = LiveIndicatorTool::execute(state, input).await.into();
            serde_json::to_value(response)?
        }
        ToolId::CompareCountries => {
            let input: CompareCountriesInput = decode_arguments(tool, arguments)?;
            serde_json::to_value(CompareCountriesTool::execute(state, input).await)?
        }
    };
    Ok(value)
}

/// Route a request to its handler and return the serialized result
///
/// `arguments` is ignored for resources.
pub async fn dispatch(state: &McpServerState, handler: &HandlerId, arguments: Value) -> Result<String> {
    match handler {
        HandlerId::Resource(resource) => read_resource(state, resource).await,
        HandlerId::Tool(tool) => {
            let value = call_tool(state, *tool, arguments).await?;
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_PARAMS;
    use crate::test_helpers::stub_state;

    #[test]
    fn test_parse_resource_uris() {
        assert_eq!("data://schema".parse::<ResourceId>().unwrap(), ResourceId::Schema);
        assert_eq!(
            "data://countries".parse::<ResourceId>().unwrap(),
            ResourceId::Countries
        );
        assert_eq!(
            "data://indicators/usa".parse::<ResourceId>().unwrap(),
            ResourceId::Indicators("usa".into())
        );
    }

    #[test]
    fn test_reject_unknown_resource_uris() {
        for uri in ["data://secrets", "data://indicators/", "file:///etc/passwd", "data://indicators/a/b"] {
            let err = uri.parse::<ResourceId>().unwrap_err();
            assert_eq!(err.code, INVALID_PARAMS, "{}", uri);
        }
    }

    #[test]
    fn test_tool_names_round_trip() {
        for tool in ToolId::ALL {
            assert_eq!(tool.name().parse::<ToolId>().unwrap(), tool);
        }
        assert!("drop_tables".parse::<ToolId>().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_resource() {
        let (state, _, _) = stub_state();
        let text = dispatch(
            &state,
            &HandlerId::Resource(ResourceId::Indicators("ind".into())),
            Value::Null,
        )
        .await
        .unwrap();
        let rows: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_call_tool_with_null_arguments_validates() {
        let (state, countries, _) = stub_state();
        let value = call_tool(&state, ToolId::CountryInfo, Value::Null).await.unwrap();
        assert_eq!(value, json!({"error": "country_code is required."}));
        assert_eq!(countries.calls(), 0);
    }

    #[tokio::test]
    async fn test_call_tool_rejects_mistyped_arguments() {
        let (state, _, indicators) = stub_state();
        let err = call_tool(
            &state,
            ToolId::LiveIndicator,
            json!({"country_code": "USA", "indicator": "X", "year": "last"}),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, INVALID_PARAMS);
        assert!(indicators.requests().is_empty());
    }

    #[tokio::test]
    async fn test_call_compare_returns_array() {
        let (state, _, _) = stub_state();
        let value = call_tool(
            &state,
            ToolId::CompareCountries,
            json!({"country_codes": ["usa", "BAD"], "indicator": "NY.GDP.PCAP.CD"}),
        )
        .await
        .unwrap();

        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["value"], 76398.6);
        assert_eq!(entries[0]["year"], 2022);
        assert_eq!(
            entries[1],
            json!({
                "error": "Invalid country code or indicator: 'BAD', 'NY.GDP.PCAP.CD'.",
                "country": "BAD"
            })
        );
    }
}
