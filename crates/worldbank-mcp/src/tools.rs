//! MCP tool implementations backed by the upstream APIs
//!
//! This module defines the three tools exposed by the MCP server:
//! - get_country_info: Country profile from the country API
//! - get_live_indicator: One indicator value for one country and year
//! - compare_countries: The same indicator lookup fanned out over many countries

use std::sync::Arc;

use tracing::{error, info, warn};
use worldbank_lib::{normalize_country_code, IndicatorSource, UpstreamError};

use crate::error::HandlerError;
use crate::server::McpServerState;
use crate::types::*;

/// Country information tool handler
pub struct CountryInfoTool;

impl CountryInfoTool {
    /// Handle a country information request
    ///
    /// Validation happens before any outbound call.
    pub async fn execute(
        state: &McpServerState,
        input: CountryInfoInput,
    ) -> Result<CountryInfoOutput, HandlerError> {
        let code = normalize_country_code(&input.country_code);
        if code.is_empty() {
            return Err(HandlerError::Validation {
                field: "country_code",
            });
        }

        info!("Fetching country info for: {}", code);

        match state.countries.fetch_country(&code).await {
            Ok(profile) => Ok(profile.into()),
            Err(UpstreamError::NotFound { status }) => {
                warn!(country = %code, status, "country not found upstream");
                Err(HandlerError::country_not_found(&code))
            }
            Err(UpstreamError::Malformed { message }) => {
                warn!(country = %code, %message, "malformed country response");
                Err(HandlerError::MalformedUpstreamResponse {
                    message: format!("No data returned for country code '{}'.", code),
                    details: Some(message),
                })
            }
            Err(UpstreamError::Unavailable { message }) => {
                warn!(country = %code, %message, "country API unavailable");
                Err(HandlerError::UpstreamUnavailable { details: message })
            }
        }
    }
}

/// Live indicator tool handler
pub struct LiveIndicatorTool;

impl LiveIndicatorTool {
    /// Handle a live indicator request
    pub async fn execute(
        state: &McpServerState,
        input: LiveIndicatorInput,
    ) -> Result<LiveIndicatorOutput, HandlerError> {
        Self::lookup(
            state.indicators.as_ref(),
            &input.country_code,
            &input.indicator,
            input.year,
        )
        .await
    }

    /// Validate, fetch, and pick the observation for exactly `year`
    ///
    /// The upstream is asked to filter by year but is not trusted to; the
    /// returned series is scanned for a textual match on the year.
    pub async fn lookup(
        source: &dyn IndicatorSource,
        raw_code: &str,
        raw_indicator: &str,
        year: i32,
    ) -> Result<LiveIndicatorOutput, HandlerError> {
        let code = normalize_country_code(raw_code);
        let indicator = raw_indicator.trim();

        if code.is_empty() {
            return Err(HandlerError::Validation {
                field: "country_code",
            });
        }
        if indicator.is_empty() {
            return Err(HandlerError::Validation { field: "indicator" });
        }

        info!("Fetching {} for {} in {}", indicator, code, year);

        let observations = source
            .fetch_indicator(&code, indicator, Some(year))
            .await
            .map_err(|err| {
                warn!(country = %code, indicator, error = %err, "indicator lookup failed");
                match err {
                    UpstreamError::NotFound { .. } => HandlerError::invalid_lookup(&code, indicator),
                    UpstreamError::Unavailable { message } => {
                        HandlerError::UpstreamUnavailable { details: message }
                    }
                    UpstreamError::Malformed { message } => {
                        HandlerError::MalformedUpstreamResponse {
                            message: "Unexpected API error.".to_string(),
                            details: Some(message),
                        }
                    }
                }
            })?;

        let wanted = year.to_string();
        let observation = observations
            .into_iter()
            .find(|o| o.year == wanted)
            .ok_or_else(|| HandlerError::no_data_for_year(year))?;

        let value = observation
            .value
            .ok_or_else(|| HandlerError::no_reported_value(indicator, year))?;

        Ok(LiveIndicatorOutput {
            country: if observation.country_code.is_empty() {
                code
            } else {
                observation.country_code
            },
            country_name: observation.country_name,
            indicator: observation
                .indicator_code
                .unwrap_or_else(|| indicator.to_string()),
            indicator_name: observation.indicator_name,
            year,
            value,
        })
    }
}

/// Country comparison tool handler
///
/// Each country is looked up on its own task so one slow or failing upstream
/// call never blocks, cancels, or reorders the others.
pub struct CompareCountriesTool;

impl CompareCountriesTool {
    /// Handle a comparison request
    ///
    /// The output has exactly one entry per input code, in input order;
    /// failures are tagged with the (normalized) code they belong to.
    pub async fn execute(
        state: &McpServerState,
        input: CompareCountriesInput,
    ) -> Vec<ToolResponse<LiveIndicatorOutput>> {
        info!(
            "Comparing {} for countries: {:?}",
            input.indicator, input.country_codes
        );

        let tasks: Vec<_> = input
            .country_codes
            .iter()
            .map(|code| {
                let source = Arc::clone(&state.indicators);
                let code = code.clone();
                let indicator = input.indicator.clone();
                let year = input.year;
                tokio::spawn(async move {
                    LiveIndicatorTool::lookup(source.as_ref(), &code, &indicator, year).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for (raw_code, task) in input.country_codes.iter().zip(tasks) {
            let code = normalize_country_code(raw_code);
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    error!(country = %code, error = %join_err, "Failed to retrieve data");
                    Err(HandlerError::Internal {
                        details: join_err.to_string(),
                    })
                }
            };

            results.push(match outcome {
                Ok(output) => ToolResponse::Success(output),
                Err(err) => ToolResponse::Failure(err.to_payload().with_country(code)),
            });
        }

        results
    }
}
