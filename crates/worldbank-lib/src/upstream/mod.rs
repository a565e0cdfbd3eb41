//! Clients for the two upstream HTTP services.
//!
//! Both clients parse the loosely-typed upstream JSON into explicit structs at
//! this boundary, so callers only ever see typed values or an
//! [`UpstreamError`]. The [`CountrySource`] and [`IndicatorSource`] traits are
//! the seams handlers depend on; tests substitute stubs for them.

pub mod country;
pub mod indicator;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};

pub use country::CountryProfile;
pub use indicator::IndicatorObservation;

/// Failure of a single upstream call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The upstream service answered with a 4xx status: no such entity.
    #[error("upstream reported no such entity (HTTP {status})")]
    NotFound { status: u16 },

    /// Network failure, timeout or 5xx status.
    #[error("upstream unavailable: {message}")]
    Unavailable { message: String },

    /// A response arrived but lacks the required structure.
    #[error("malformed upstream response: {message}")]
    Malformed { message: String },
}

/// Source of country profiles.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fetch one country's profile. `code` is already normalized.
    async fn fetch_country(&self, code: &str) -> std::result::Result<CountryProfile, UpstreamError>;
}

/// Source of yearly indicator observations.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Fetch the observations for one country and indicator.
    ///
    /// `year` is a filter hint only; callers must still look for the exact year
    /// in the result. An unknown indicator yields an empty vector.
    async fn fetch_indicator(
        &self,
        code: &str,
        indicator: &str,
        year: Option<i32>,
    ) -> std::result::Result<Vec<IndicatorObservation>, UpstreamError>;
}

/// Build the shared HTTP client with the configured per-request timeout.
pub(crate) fn build_http_client(config: &UpstreamConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("worldbank-gateway/", env!("CARGO_PKG_VERSION")))
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

/// Parse and validate a configured base URL.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|err| Error::InvalidUpstreamUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUpstreamUrl {
            url: raw.to_string(),
            reason: "url cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Send `request` and decode a JSON body, mapping every failure onto [`UpstreamError`].
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> std::result::Result<T, UpstreamError> {
    let response = request
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    if status.is_client_error() {
        return Err(UpstreamError::NotFound {
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(UpstreamError::Unavailable {
            message: format!("upstream returned HTTP {status}"),
        });
    }

    let body = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&body).map_err(|err| UpstreamError::Malformed {
        message: err.to_string(),
    })
}

fn transport_error(err: reqwest::Error) -> UpstreamError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    UpstreamError::Unavailable { message }
}
