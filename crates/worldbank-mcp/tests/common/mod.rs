//! Shared helpers for MCP integration tests

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Number, Value};
use worldbank_lib::{
    CountryProfile, CountrySource, Dataset, IndicatorObservation, IndicatorSource, UpstreamError,
};
use worldbank_mcp::McpServerState;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/world_bank_indicators.csv")
}

/// Country source that knows only Germany
pub struct GermanyOnly;

#[async_trait]
impl CountrySource for GermanyOnly {
    async fn fetch_country(&self, code: &str) -> Result<CountryProfile, UpstreamError> {
        if code != "DEU" && code != "DE" {
            return Err(UpstreamError::NotFound { status: 404 });
        }
        Ok(CountryProfile {
            name: Some("Germany".into()),
            capital: Some("Berlin".into()),
            region: Some("Europe".into()),
            subregion: Some("Western Europe".into()),
            languages: vec!["German".into()],
            currencies: vec!["EUR".into()],
            population: Some(83_240_525),
            flag: None,
        })
    }
}

/// Indicator source serving a population series for USA and CHN
pub struct PopulationSeries;

#[async_trait]
impl IndicatorSource for PopulationSeries {
    async fn fetch_indicator(
        &self,
        code: &str,
        indicator: &str,
        _year: Option<i32>,
    ) -> Result<Vec<IndicatorObservation>, UpstreamError> {
        if indicator != "SP.POP.TOTL" {
            return Err(UpstreamError::NotFound { status: 400 });
        }
        let value: Number = match code {
            "USA" => 333_287_557u64.into(),
            "CHN" => 1_412_175_000u64.into(),
            "OUT" => {
                return Err(UpstreamError::Unavailable {
                    message: "operation timed out".into(),
                })
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![IndicatorObservation {
            country_code: code.to_string(),
            country_name: None,
            indicator_code: Some(indicator.to_string()),
            indicator_name: Some("Population, total".into()),
            year: "2022".into(),
            value: Some(value),
        }])
    }
}

pub fn server_state() -> McpServerState {
    let dataset = Dataset::load(&fixture_path()).expect("fixture dataset should load");
    McpServerState::new(dataset, Arc::new(GermanyOnly), Arc::new(PopulationSeries))
}

pub fn request(id: u64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

/// Decode the text body of a successful `tools/call` response
pub fn tool_text(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("tool response should carry text content");
    serde_json::from_str(text).expect("tool text should be JSON")
}

/// Decode the text body of a successful `resources/read` response
pub fn resource_text(response: &Value) -> Value {
    let text = response["result"]["contents"][0]["text"]
        .as_str()
        .expect("resource response should carry text contents");
    serde_json::from_str(text).expect("resource text should be JSON")
}
