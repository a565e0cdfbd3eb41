//! Handler state and server metadata
//!
//! This module contains the state shared by every resource and tool handler:
//! the immutable dataset and the two upstream sources. Nothing in it is
//! mutated after construction, so concurrent requests need no locking.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use worldbank_lib::{
    CountryClient, CountrySource, Dataset, IndicatorClient, IndicatorSource, UpstreamConfig,
};

use crate::dispatch::{ResourceId, ToolId};

/// Main server state holding all runtime resources
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct McpServerState {
    /// The local indicator table, loaded once
    pub dataset: Arc<Dataset>,

    /// Country-profile upstream
    pub countries: Arc<dyn CountrySource>,

    /// Indicator-series upstream
    pub indicators: Arc<dyn IndicatorSource>,
}

/// Descriptor for MCP resources exposed by the server
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

/// Descriptor for parameterized resources (`resources/templates/list`)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResourceTemplateDescriptor {
    #[serde(rename = "uriTemplate")]
    pub uri_template: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

/// Descriptor for MCP tools, including the generated input schema
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub const JSON_MIME: &str = "application/json";

impl McpServerState {
    /// Create a server state from an already loaded dataset and upstream sources
    pub fn new(
        dataset: Dataset,
        countries: Arc<dyn CountrySource>,
        indicators: Arc<dyn IndicatorSource>,
    ) -> Self {
        Self {
            dataset: Arc::new(dataset),
            countries,
            indicators,
        }
    }

    /// Load the dataset at `dataset_path` and build HTTP clients from `config`
    ///
    /// A missing or unreadable dataset is returned as
    /// [`worldbank_lib::Error::DataUnavailable`] and should abort start-up.
    pub fn with_path<P: AsRef<Path>>(
        dataset_path: P,
        config: &UpstreamConfig,
    ) -> worldbank_lib::Result<Self> {
        let path = dataset_path.as_ref();
        info!("Loading MCP server state from {}", path.display());

        let dataset = Dataset::load(path)?;
        let countries = Arc::new(CountryClient::new(config)?);
        let indicators = Arc::new(IndicatorClient::new(config)?);

        info!(
            rest_countries = %config.rest_countries_url,
            world_bank = %config.world_bank_url,
            timeout = ?config.timeout,
            "Configured upstream clients"
        );

        Ok(Self::new(dataset, countries, indicators))
    }

    /// Log a start-up summary of the loaded dataset
    pub fn initialize(&self) {
        info!(
            "MCP Server initialized with {} rows covering {} countries",
            self.dataset.len(),
            self.dataset.distinct_countries().len()
        );
    }

    /// List fixed MCP resources exposed by this server
    pub fn resources(&self) -> Vec<ResourceDescriptor> {
        vec![
            ResourceDescriptor {
                uri: ResourceId::SCHEMA_URI,
                name: "Dataset Schema",
                description: "Column names of the World Bank dataset mapped to their types",
                mime_type: JSON_MIME,
            },
            ResourceDescriptor {
                uri: ResourceId::COUNTRIES_URI,
                name: "Countries",
                description: "Unique country codes and names present in the dataset",
                mime_type: JSON_MIME,
            },
        ]
    }

    /// List parameterized MCP resources exposed by this server
    pub fn resource_templates(&self) -> Vec<ResourceTemplateDescriptor> {
        vec![ResourceTemplateDescriptor {
            uri_template: ResourceId::INDICATORS_TEMPLATE,
            name: "Country Indicators",
            description: "All local indicator rows for one ISO3 country code",
            mime_type: JSON_MIME,
        }]
    }

    /// List MCP tools exposed by this server
    pub fn tools(&self) -> Vec<ToolDescriptor> {
        ToolId::ALL
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name(),
                description: tool.description(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_state;

    #[test]
    fn test_resources_descriptor_includes_two_resources() {
        let state = test_state();

        let resources = state.resources();
        assert_eq!(resources.len(), 2);
        assert!(resources.iter().any(|r| r.uri == "data://schema"));
        assert!(resources.iter().any(|r| r.uri == "data://countries"));
        assert!(resources.iter().all(|r| r.mime_type == JSON_MIME));
    }

    #[test]
    fn test_indicator_template() {
        let templates = test_state().resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].uri_template, "data://indicators/{country_code}");
    }

    #[test]
    fn test_tools_have_object_schemas() {
        let tools = test_state().tools();
        let names: Vec<_> = tools.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["get_country_info", "get_live_indicator", "compare_countries"]
        );
        for tool in &tools {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
        let compare = &tools[2].input_schema["properties"];
        assert!(compare["country_codes"].is_object());
        assert!(compare["indicator"].is_object());
    }

    #[test]
    fn test_with_path_missing_dataset_fails() {
        let result = McpServerState::with_path(
            "/nonexistent/world_bank_indicators.csv",
            &UpstreamConfig::default(),
        );
        assert!(matches!(
            result,
            Err(worldbank_lib::Error::DataUnavailable { .. })
        ));
    }
}
