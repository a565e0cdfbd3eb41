//! Country-profile client (REST Countries v3.1 shape).

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_http_client, endpoint_url, get_json, parse_base_url, CountrySource, UpstreamError};
use crate::config::UpstreamConfig;
use crate::error::Result;

/// Normalized profile of one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountryProfile {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    /// Display names of the official languages.
    pub languages: Vec<String>,
    /// Currency codes (e.g. `USD`).
    pub currencies: Vec<String>,
    pub population: Option<u64>,
    /// Flag glyph.
    pub flag: Option<String>,
}

/// The upstream answers `/alpha/{code}` with a single-element array, but a bare
/// object is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountryPayload {
    Many(Vec<RawCountry>),
    One(Box<RawCountry>),
}

#[derive(Debug, Default, Deserialize)]
struct RawCountry {
    name: Option<RawName>,
    capital: Option<Vec<String>>,
    region: Option<String>,
    subregion: Option<String>,
    languages: Option<BTreeMap<String, String>>,
    currencies: Option<BTreeMap<String, IgnoredAny>>,
    population: Option<u64>,
    flag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawName {
    common: Option<String>,
}

impl From<RawCountry> for CountryProfile {
    fn from(raw: RawCountry) -> Self {
        Self {
            name: raw.name.and_then(|n| n.common),
            capital: raw.capital.and_then(|c| c.into_iter().next()),
            region: raw.region,
            subregion: raw.subregion,
            languages: raw
                .languages
                .map(|l| l.into_values().collect())
                .unwrap_or_default(),
            currencies: raw
                .currencies
                .map(|c| c.into_keys().collect())
                .unwrap_or_default(),
            population: raw.population,
            flag: raw.flag,
        }
    }
}

/// HTTP client for the country-profile API.
#[derive(Debug, Clone)]
pub struct CountryClient {
    http: Client,
    base_url: Url,
}

impl CountryClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            base_url: parse_base_url(&config.rest_countries_url)?,
        })
    }

    /// Fetch one country's profile.
    ///
    /// Missing optional fields become `None`/empty; only the presence of a
    /// country record is required.
    pub async fn fetch(&self, code: &str) -> std::result::Result<CountryProfile, UpstreamError> {
        let url = endpoint_url(&self.base_url, &["alpha", code]);
        debug!(%url, "fetching country profile");

        let payload: CountryPayload = get_json(self.http.get(url)).await?;
        let raw = match payload {
            CountryPayload::Many(list) => list.into_iter().next(),
            CountryPayload::One(country) => Some(*country),
        };

        raw.map(CountryProfile::from)
            .ok_or_else(|| UpstreamError::Malformed {
                message: format!("no country record returned for '{code}'"),
            })
    }
}

#[async_trait]
impl CountrySource for CountryClient {
    async fn fetch_country(&self, code: &str) -> std::result::Result<CountryProfile, UpstreamError> {
        self.fetch(code).await
    }
}
