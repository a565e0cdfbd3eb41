//! Type definitions for MCP tool inputs and outputs
//!
//! Inputs derive `JsonSchema` so `tools/list` can advertise them. Missing
//! string arguments deserialize as empty strings on purpose: the handlers
//! report them as validation payloads instead of protocol faults.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use worldbank_lib::CountryProfile;

use crate::error::{ErrorPayload, HandlerError};

/// Year used when a tool call does not specify one
pub const DEFAULT_YEAR: i32 = 2022;

fn default_year() -> i32 {
    DEFAULT_YEAR
}

// ============================================================================
// TOOL INPUTS
// ============================================================================

/// Input for the get_country_info tool
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CountryInfoInput {
    /// ISO 3166-1 alpha-2 or alpha-3 country code (e.g., "US", "USA", "DE")
    #[serde(default)]
    pub country_code: String,
}

/// Input for the get_live_indicator tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LiveIndicatorInput {
    /// ISO 3166-1 alpha-2 or alpha-3 country code
    #[serde(default)]
    pub country_code: String,

    /// World Bank indicator ID (e.g., "NY.GDP.PCAP.CD" for GDP per capita)
    #[serde(default)]
    pub indicator: String,

    /// Year to fetch data for (default: 2022)
    #[serde(default = "default_year")]
    pub year: i32,
}

/// Input for the compare_countries tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompareCountriesInput {
    /// ISO country codes to compare (e.g., ["USA", "CHN", "DEU"])
    #[serde(default)]
    pub country_codes: Vec<String>,

    /// World Bank indicator ID to compare
    #[serde(default)]
    pub indicator: String,

    /// Year to fetch data for (default: 2022)
    #[serde(default = "default_year")]
    pub year: i32,
}

// ============================================================================
// TOOL OUTPUTS
// ============================================================================

/// Output from the get_country_info tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryInfoOutput {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub languages: Vec<String>,
    pub currencies: Vec<String>,
    pub population: Option<u64>,
    pub flag: Option<String>,
}

impl From<CountryProfile> for CountryInfoOutput {
    fn from(profile: CountryProfile) -> Self {
        Self {
            name: profile.name,
            capital: profile.capital,
            region: profile.region,
            subregion: profile.subregion,
            languages: profile.languages,
            currencies: profile.currencies,
            population: profile.population,
            flag: profile.flag,
        }
    }
}

/// Output from the get_live_indicator tool (and each successful compare entry)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveIndicatorOutput {
    /// Country code as reported by the upstream
    pub country: String,
    pub country_name: Option<String>,
    /// Indicator ID
    pub indicator: String,
    pub indicator_name: Option<String>,
    pub year: i32,
    /// Upstream number as reported (integer series are not widened to floats)
    pub value: Number,
}

/// Either a handler's result or its structured error payload
///
/// Serialized untagged, so a success is the bare output object and a failure
/// is `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResponse<T> {
    Success(T),
    Failure(ErrorPayload),
}

impl<T> ToolResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolResponse::Success(_))
    }
}

impl<T> From<std::result::Result<T, HandlerError>> for ToolResponse<T> {
    fn from(result: std::result::Result<T, HandlerError>) -> Self {
        match result {
            Ok(output) => ToolResponse::Success(output),
            Err(err) => ToolResponse::Failure(err.to_payload()),
        }
    }
}
