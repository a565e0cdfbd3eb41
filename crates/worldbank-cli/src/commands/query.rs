use anyhow::{Context, Result};
use serde_json::Value;
use worldbank_mcp::dispatch::dispatch;
use worldbank_mcp::{HandlerId, McpServerState};

use super::{configure_tracing, load_state};
use crate::GlobalOptions;

/// Answer one resource read or tool call and return the pretty-printed body.
///
/// Handler error payloads are part of the body; only unknown identifiers or
/// undecodable arguments fail.
pub async fn render(state: &McpServerState, handler: &HandlerId, arguments: Value) -> Result<String> {
    dispatch(state, handler, arguments)
        .await
        .with_context(|| format!("request for {:?} was rejected", handler))
}

/// Load the dataset, answer one request and print it on stdout.
pub async fn run_query(global: &GlobalOptions, handler: HandlerId, arguments: Value) -> Result<()> {
    configure_tracing(global.log_level.as_deref(), "warn")?;

    let state = load_state(global)?;
    let body = render(&state, &handler, arguments).await?;
    println!("{}", body);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use worldbank_lib::UpstreamConfig;
    use worldbank_mcp::{ResourceId, ToolId};

    fn fixture_state() -> McpServerState {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../docs/fixtures/world_bank_indicators.csv");
        McpServerState::with_path(path, &UpstreamConfig::default()).expect("fixture loads")
    }

    #[tokio::test]
    async fn renders_countries_resource() {
        let state = fixture_state();
        let body = render(&state, &HandlerId::Resource(ResourceId::Countries), Value::Null)
            .await
            .unwrap();
        let countries: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(countries.len(), 5);
    }

    #[tokio::test]
    async fn renders_validation_payload_without_network() {
        let state = fixture_state();
        let body = render(
            &state,
            &HandlerId::Tool(ToolId::CountryInfo),
            json!({"country_code": "  "}),
        )
        .await
        .unwrap();
        let payload: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(payload, json!({"error": "country_code is required."}));
    }

    #[tokio::test]
    async fn rejects_undecodable_arguments() {
        let state = fixture_state();
        let err = render(
            &state,
            &HandlerId::Tool(ToolId::CompareCountries),
            json!({"country_codes": "USA"}),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }
}
