//! Indicator-series client (World Bank v2 API shape).
//!
//! The upstream answers with a two-element array `[metadata, observations]`.
//! An error envelope (`[{"message": [...]}]`) or a `null` observation list is
//! how the API says "nothing here", so both decode to an empty vector: the API
//! does not distinguish an unknown indicator from a country without data.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use tracing::debug;

use super::{
    build_http_client, endpoint_url, get_json, parse_base_url, IndicatorSource, UpstreamError,
};
use crate::config::UpstreamConfig;
use crate::error::Result;

/// Observations requested per page; one page covers every year the API publishes.
const PER_PAGE: &str = "100";

/// One yearly data point for a country and indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorObservation {
    /// ISO3 code reported by the upstream, falling back to its country id.
    pub country_code: String,
    pub country_name: Option<String>,
    pub indicator_code: Option<String>,
    pub indicator_name: Option<String>,
    /// Year exactly as reported upstream (compare as text).
    pub year: String,
    /// Value as the upstream number, so integer series stay integers.
    pub value: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    indicator: Option<RawRef>,
    country: Option<RawRef>,
    countryiso3code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    value: Option<Number>,
}

#[derive(Debug, Deserialize)]
struct RawRef {
    id: Option<String>,
    value: Option<String>,
}

impl From<RawObservation> for IndicatorObservation {
    fn from(raw: RawObservation) -> Self {
        let (country_id, country_name) = raw
            .country
            .map(|c| (c.id, c.value))
            .unwrap_or((None, None));
        let (indicator_code, indicator_name) = raw
            .indicator
            .map(|i| (i.id, i.value))
            .unwrap_or((None, None));

        let country_code = raw
            .countryiso3code
            .filter(|code| !code.is_empty())
            .or(country_id)
            .unwrap_or_default();

        Self {
            country_code,
            country_name,
            indicator_code,
            indicator_name,
            year: raw.date.unwrap_or_default(),
            value: raw.value,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Number(Number),
    Text(String),
}

/// Accept `"2022"` or `2022` for fields the upstream is inconsistent about.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|v| match v {
        TextOrNumber::Number(n) => n.to_string(),
        TextOrNumber::Text(s) => s,
    }))
}

/// Accept `76398.6` or `"76398.6"`; unparseable text becomes `None`.
///
/// Numbers pass through untouched: `333287557` stays an integer.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Number>, D::Error> {
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.and_then(|v| match v {
        TextOrNumber::Number(n) => Some(n),
        TextOrNumber::Text(s) => parse_number(s.trim()),
    }))
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Split the `[metadata, observations]` envelope.
fn decode_envelope(payload: Value) -> std::result::Result<Vec<IndicatorObservation>, UpstreamError> {
    let Value::Array(mut parts) = payload else {
        return Err(UpstreamError::Malformed {
            message: "expected a [metadata, observations] array".to_string(),
        });
    };

    if parts.len() < 2 {
        return Ok(Vec::new());
    }

    match parts.swap_remove(1) {
        Value::Null => Ok(Vec::new()),
        observations @ Value::Array(_) => {
            let raw: Vec<RawObservation> =
                serde_json::from_value(observations).map_err(|err| UpstreamError::Malformed {
                    message: format!("invalid observation list: {err}"),
                })?;
            Ok(raw.into_iter().map(IndicatorObservation::from).collect())
        }
        other => Err(UpstreamError::Malformed {
            message: format!("observation list has unexpected type: {other}"),
        }),
    }
}

/// HTTP client for the indicator API.
#[derive(Debug, Clone)]
pub struct IndicatorClient {
    http: Client,
    base_url: Url,
}

impl IndicatorClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            base_url: parse_base_url(&config.world_bank_url)?,
        })
    }

    /// Fetch the observation series for one country and indicator.
    ///
    /// `year`, when given, is forwarded as the `date` filter.
    pub async fn fetch(
        &self,
        code: &str,
        indicator: &str,
        year: Option<i32>,
    ) -> std::result::Result<Vec<IndicatorObservation>, UpstreamError> {
        let url = endpoint_url(&self.base_url, &["country", code, "indicator", indicator]);

        let mut query: Vec<(&str, String)> = vec![
            ("format", "json".to_string()),
            ("per_page", PER_PAGE.to_string()),
        ];
        if let Some(year) = year {
            query.push(("date", year.to_string()));
        }
        debug!(%url, ?year, "fetching indicator series");

        let payload: Value = get_json(self.http.get(url).query(&query)).await?;
        decode_envelope(payload)
    }
}

#[async_trait]
impl IndicatorSource for IndicatorClient {
    async fn fetch_indicator(
        &self,
        code: &str,
        indicator: &str,
        year: Option<i32>,
    ) -> std::result::Result<Vec<IndicatorObservation>, UpstreamError> {
        self.fetch(code, indicator, year).await
    }
}
