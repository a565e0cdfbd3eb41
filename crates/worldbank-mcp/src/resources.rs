//! MCP resource implementations over the local dataset
//!
//! This module defines the three resources exposed by the MCP server:
//! - data://schema: Column names mapped to their type names
//! - data://countries: Unique country codes and names
//! - data://indicators/{country_code}: All rows for one country

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;
use worldbank_lib::{normalize_country_code, ColumnSchema};

use crate::error::HandlerError;
use crate::server::McpServerState;
use crate::Result;

/// Dataset schema resource
pub struct SchemaResource;

/// Column-name to type-name object, keeping the dataset's column order
struct SchemaBody<'a>(&'a [ColumnSchema]);

impl Serialize for SchemaBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for column in self.0 {
            map.serialize_entry(&column.name, column.dtype.as_str())?;
        }
        map.end()
    }
}

impl SchemaResource {
    /// Handle a schema resource read
    ///
    /// Known columns come first, then extra columns in file order.
    pub async fn read(state: &McpServerState) -> Result<String> {
        Ok(serde_json::to_string_pretty(&SchemaBody(state.dataset.schema()))?)
    }
}

/// Countries resource
///
/// Returns every distinct `{countryiso3code, country}` pair, sorted by code.
pub struct CountriesResource;

impl CountriesResource {
    /// Handle a countries resource read
    pub async fn read(state: &McpServerState) -> Result<String> {
        let countries = state.dataset.distinct_countries();
        Ok(serde_json::to_string_pretty(&countries)?)
    }
}

/// Per-country indicators resource
///
/// An unknown code yields a not-found payload, never an empty array.
pub struct IndicatorsResource;

impl IndicatorsResource {
    /// Handle an indicators resource read for `country_code`
    pub async fn read(state: &McpServerState, country_code: &str) -> Result<String> {
        let code = normalize_country_code(country_code);
        info!("Reading local indicators for: {}", code);

        let rows = state.dataset.by_country(&code);
        if rows.is_empty() {
            let payload = HandlerError::NotFoundInLocalData { code }.to_payload();
            return Ok(serde_json::to_string_pretty(&payload)?);
        }

        Ok(serde_json::to_string_pretty(&rows)?)
    }
}
